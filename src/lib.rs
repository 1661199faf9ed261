pub mod api;
pub mod config;
pub mod distance;
pub mod filter;
pub mod geocode;
pub mod map;
pub mod model;
pub mod nearest;
pub mod normalize;

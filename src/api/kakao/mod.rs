pub mod client;
pub mod types;

pub use client::Client;
pub use types::*;

pub mod kakao;
pub mod service;
pub mod store;

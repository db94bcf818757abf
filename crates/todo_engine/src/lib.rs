pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod storage;

// API module - HTTP surface of the grading service
#![allow(dead_code, unused_imports)]

pub mod config;
pub mod error;
pub mod server;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, ApiInitError};
pub use server::{ApiServer, AppState, router};

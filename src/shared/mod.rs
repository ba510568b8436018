//! Shared infrastructure: configuration.

pub mod config;

pub use config::AppConfig;

//! Laptop catalog service: configuration, wiring, metrics and the HTTP gateway.

pub mod app;
pub mod cli;
pub mod config;
pub mod metrics;
pub mod server;

pub use app::CatalogApp;
pub use config::{load_config, CatalogConfig, LoadedConfig};

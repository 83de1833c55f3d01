//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, ServerConfig, DatabaseConfig, AccessLogConfig)
//! - [`validation`]: Startup checks that catch unusable paths early

mod types;
pub mod validation;

pub use types::Config;

//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::db::MEMORY_PATH;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("database.path is required")]
    MissingDatabasePath,
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
    #[error("access_log.path is required")]
    MissingAccessLogPath,
    #[error("access_log.path parent directory does not exist: {0}")]
    AccessLogPathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Database path validation
    let db_path = &config.database.path;
    if db_path.is_empty() {
        errors.push(ValidationError::MissingDatabasePath);
    } else if db_path != MEMORY_PATH && !parent_exists(db_path) {
        errors.push(ValidationError::DatabasePathInvalid(db_path.clone()));
    }

    // Access log path validation
    let log_path = &config.access_log.path;
    if log_path.is_empty() {
        errors.push(ValidationError::MissingAccessLogPath);
    } else if !parent_exists(log_path) {
        errors.push(ValidationError::AccessLogPathInvalid(log_path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A bare file name has an empty parent, which means the working directory.
fn parent_exists(path: &str) -> bool {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.exists(),
        _ => true,
    }
}

//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, LOG_LEVELS, STORE_BACKENDS};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_store(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    /// Validate and turn the first error into a [`ConfigError`].
    ///
    /// Warnings are handed back to the caller.
    pub fn ensure_valid(config: &Config) -> Result<ValidationResult, ConfigError> {
        let result = Self::validate(config)?;

        if let Some(error) = result.errors.first() {
            return Err(ConfigError::InvalidValue {
                field: error.path.clone(),
                message: error.message.clone(),
            });
        }

        Ok(result)
    }

    fn validate_store(config: &Config, result: &mut ValidationResult) {
        if !STORE_BACKENDS.contains(&config.store.backend.as_str()) {
            result.add_error(ValidationError::new(
                "store.backend",
                format!(
                    "Unknown store backend '{}', valid values: {:?}",
                    config.store.backend, STORE_BACKENDS
                ),
            ));
        }

        if config.store.backend == "sqlite" && config.store.path.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "store.path",
                "SQLite backend requires a database path",
            ));
        }

        if config.store.backend == "memory" {
            result.add_warning(ValidationWarning::new(
                "store.backend",
                "Memory backend keeps job records only until the process exits",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }

        if let Some(ref dir) = config.logging.directory {
            if dir.exists() && !dir.is_dir() {
                result.add_error(ValidationError::new(
                    "logging.directory",
                    format!("Log directory is not a directory: {:?}", dir),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

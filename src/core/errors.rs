/*!
 * Error Types
 * Configuration errors with thiserror, miette, and serde support
 *
 * Shard access itself is total and has no error type: an unavailable core id
 * is handled by the random fallback, and an out-of-range shard index is a
 * contract violation (panic), not a recoverable error.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value {value:?} for environment variable {var}: {reason}")]
    #[diagnostic(code(config::invalid_env))]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
        /// What the variable accepts, phrased as advice
        #[help]
        help: String,
    },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// `expected` completes "set it to ...", e.g. "a non-negative integer"
    pub(crate) fn invalid_env(
        var: &str,
        value: &str,
        reason: impl ToString,
        expected: &str,
    ) -> Self {
        ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            help: format!("Unset the variable or set it to {}.", expected),
        }
    }
}

/// Result type for configuration parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

/*!
 * Core-Local Array Configuration
 *
 * Sizing input for `CoreLocalArray`: either the detected hardware
 * concurrency or an explicit override.
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::shard_manager::ShardManager;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the concurrency hint
pub const CONCURRENCY_ENV: &str = "CORE_LOCAL_CONCURRENCY";

/// Advice attached to numeric variables that fail to parse
pub(crate) const NUMBER_EXPECTED: &str = "a non-negative integer";

/// Read an environment variable, trimmed
///
/// Unset and blank both yield `None`; a value that is not valid unicode is an
/// error rather than "unset".
pub(crate) fn read_env(var: &str, expected: &str) -> ConfigResult<Option<String>> {
    match std::env::var(var) {
        Ok(raw) => {
            let trimmed = raw.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(raw)) => Err(ConfigError::invalid_env(
            var,
            &raw.to_string_lossy(),
            "not valid unicode",
            expected,
        )),
    }
}

/// Array sizing configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayConfig {
    /// Concurrency hint; `None` queries the hardware at construction time
    pub concurrency_hint: Option<usize>,
}

impl ArrayConfig {
    /// Size from the detected hardware concurrency
    pub const fn detect() -> Self {
        Self {
            concurrency_hint: None,
        }
    }

    /// Size from an explicit hint (0 means "unknown" and yields the minimum)
    pub const fn with_hint(hint: usize) -> Self {
        Self {
            concurrency_hint: Some(hint),
        }
    }

    /// Read the hint override from `CORE_LOCAL_CONCURRENCY`
    ///
    /// Unset or empty means detect.
    pub fn from_env() -> ConfigResult<Self> {
        match read_env(CONCURRENCY_ENV, NUMBER_EXPECTED)? {
            Some(raw) => Self::parse_hint(&raw),
            None => Ok(Self::detect()),
        }
    }

    fn parse_hint(raw: &str) -> ConfigResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::detect());
        }
        trimmed
            .parse::<usize>()
            .map(Self::with_hint)
            .map_err(|e| ConfigError::invalid_env(CONCURRENCY_ENV, raw, e, NUMBER_EXPECTED))
    }

    /// The hint construction will use
    pub fn resolved_hint(&self) -> usize {
        self.concurrency_hint
            .unwrap_or_else(ShardManager::cpu_count)
    }

    /// Shard count an array built from this config will have
    pub fn shard_count(&self) -> usize {
        ShardManager::shard_count(self.resolved_hint())
    }
}

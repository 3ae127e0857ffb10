//! Process-wide container configuration.

use super::{parse_env_bool, Config};
use crate::diagnostics::DiagnosticPolicy;
use crate::error::{ContainerError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Settings shared by every container in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// How out-of-range and empty-container anomalies are reported
    pub diagnostic_policy: DiagnosticPolicy,
    /// Emit a `debug` log record every time a buffer is reallocated
    pub log_growth: bool,
    /// Smallest new capacity worth tracing when `log_growth` is set
    pub growth_log_min_capacity: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            diagnostic_policy: DiagnosticPolicy::Log,
            log_growth: false,
            growth_log_min_capacity: 0,
        }
    }
}

impl Config for ContainerConfig {
    fn validate(&self) -> Result<()> {
        if !self.log_growth && self.growth_log_min_capacity > 0 {
            return Err(ContainerError::configuration(
                "growth_log_min_capacity is set but log_growth is disabled",
            ));
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(format!("{}DIAGNOSTIC_POLICY", prefix)) {
            config.diagnostic_policy = raw.parse()?;
        }
        config.log_growth = parse_env_bool(&format!("{}LOG_GROWTH", prefix), config.log_growth);
        config.growth_log_min_capacity = super::parse_env_var(
            &format!("{}GROWTH_LOG_MIN_CAPACITY", prefix),
            config.growth_log_min_capacity,
        );

        config.validate()?;
        Ok(config)
    }

    fn strict_preset() -> Self {
        Self {
            diagnostic_policy: DiagnosticPolicy::Strict,
            log_growth: true,
            growth_log_min_capacity: 0,
        }
    }

    fn quiet_preset() -> Self {
        Self {
            diagnostic_policy: DiagnosticPolicy::Silent,
            log_growth: false,
            growth_log_min_capacity: 0,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            ContainerError::configuration(format!("Failed to serialize container config: {}", e))
        })?;

        std::fs::write(path, serialized).map_err(|e| {
            ContainerError::configuration(format!("Failed to write container config file: {}", e))
        })?;

        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ContainerError::configuration(format!("Failed to read container config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ContainerError::configuration(format!("Failed to parse container config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }
}

impl ContainerConfig {
    /// Whether a reallocation to `new_capacity` should be traced.
    #[inline]
    pub fn traces_growth_to(&self, new_capacity: usize) -> bool {
        self.log_growth && new_capacity >= self.growth_log_min_capacity
    }
}

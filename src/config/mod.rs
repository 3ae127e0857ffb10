//! Configuration APIs for catvec
//!
//! The containers themselves take no per-instance configuration. What is
//! configurable is process-wide behaviour: how anomalies are reported and
//! whether buffer growth is traced.
//!
//! # Preset Configurations
//!
//! ```rust
//! use catvec::config::{Config, ContainerConfig};
//!
//! // Panic on every anomaly, trace growth
//! let config = ContainerConfig::strict_preset();
//!
//! // Fallback values with no logging at all
//! let config = ContainerConfig::quiet_preset();
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use catvec::config::{Config, ContainerConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads CATVEC_DIAGNOSTIC_POLICY and CATVEC_LOG_GROWTH
//! let config = ContainerConfig::from_env()?;
//!
//! // Same variables under a custom prefix
//! let config = ContainerConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::path::Path;

pub mod container;

pub use container::ContainerConfig;

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Environment variables use the format `CATVEC_{FIELD}`, for example
    /// `CATVEC_DIAGNOSTIC_POLICY=strict`.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("CATVEC_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset for debug and test runs: every anomaly is fatal.
    fn strict_preset() -> Self;

    /// Preset for hot paths where anomalies are expected and handled by the caller.
    fn quiet_preset() -> Self;

    /// Get a balanced preset configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load configuration from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

static GLOBAL_CONFIG: Lazy<ContainerConfig> = Lazy::new(|| {
    ContainerConfig::from_env().unwrap_or_else(|e| {
        log::warn!("Ignoring container environment configuration: {}", e);
        ContainerConfig::default()
    })
});

/// Process-wide configuration, read from the environment on first use.
pub fn global() -> &'static ContainerConfig {
    &GLOBAL_CONFIG
}

/// Utility function to parse environment variable with fallback to default.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Utility function to parse boolean environment variable.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}

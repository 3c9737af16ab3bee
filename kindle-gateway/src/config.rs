//! Gateway configuration, read from environment-style variables.

use kindle_core::{InstanceId, StartupPassword};

/// Address the HTTP server binds to when `KINDLE_LISTEN_ADDR` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3456";

/// Errors raised while loading the gateway configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("required variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set but its value is unusable.
    #[error("invalid value for {key}: {source}")]
    Invalid {
        key: &'static str,
        #[source]
        source: kindle_core::CoreError,
    },
}

/// Settings of one gateway process.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// The instance the gateway is allowed to start (`INSTANCE_ID`).
    pub instance_id: InstanceId,

    /// Optional path password (`PASSWORD`). Empty means disabled.
    pub password: Option<StartupPassword>,

    /// Socket address for the HTTP server (`KINDLE_LISTEN_ADDR`).
    pub listen_addr: String,
}

impl GatewayConfig {
    /// Load the configuration through `lookup`, typically `std::env::var(..).ok()`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if `INSTANCE_ID` is unset or empty and
    /// [`ConfigError::Invalid`] if it is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_id = lookup("INSTANCE_ID")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("INSTANCE_ID"))?;
        let instance_id = InstanceId::new(raw_id)
            .map_err(|source| ConfigError::Invalid { key: "INSTANCE_ID", source })?;

        let password = lookup("PASSWORD").and_then(StartupPassword::new);

        let listen_addr = lookup("KINDLE_LISTEN_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());

        Ok(Self { instance_id, password, listen_addr })
    }
}

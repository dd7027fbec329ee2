//! Refresh scheduler configuration.

use std::time::Duration;

use rotor_core::{Result, StoreError};
use serde::{Deserialize, Serialize};

/// Default interval between refresh attempts.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Suffix appended to the store name to form its health component name.
const HEALTH_COMPONENT_SUFFIX: &str = "-rotator";

/// Configuration for one refresh scheduler.
///
/// The same interval drives both the startup retry delay and the
/// steady-state polling period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshConfig {
    /// Identifier of the logical store.
    store_name: String,

    /// Interval between refresh attempts, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    refresh_interval_ms: u64,
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_millis() as u64
}

impl RefreshConfig {
    /// Creates a new configuration.
    ///
    /// The result is not validated; [`RefreshScheduler::new`] validates it.
    ///
    /// [`RefreshScheduler::new`]: crate::RefreshScheduler::new
    pub fn new(store_name: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            store_name: store_name.into(),
            refresh_interval_ms: refresh_interval.as_millis() as u64,
        }
    }

    /// Creates a new builder for RefreshConfig.
    pub fn builder() -> RefreshConfigBuilder {
        RefreshConfigBuilder::default()
    }

    /// Returns the store name.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Returns the refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Returns the refresh interval in milliseconds.
    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh_interval_ms
    }

    /// Returns the name under which the scheduler reports health.
    pub fn health_component_name(&self) -> String {
        format!("{}{}", self.store_name, HEALTH_COMPONENT_SUFFIX)
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `StoreError::Configuration` if the store name is blank or the
    /// interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.store_name.trim().is_empty() {
            return Err(StoreError::config("store name cannot be empty"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(StoreError::config(format!(
                "refresh interval for store '{}' must be positive",
                self.store_name
            )));
        }
        Ok(())
    }
}

/// Builder for RefreshConfig.
#[derive(Debug, Default)]
pub struct RefreshConfigBuilder {
    store_name: Option<String>,
    refresh_interval: Option<Duration>,
}

impl RefreshConfigBuilder {
    /// Sets the store name.
    pub fn store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    /// Sets the refresh interval.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Sets the refresh interval in milliseconds.
    pub fn refresh_interval_ms(self, ms: u64) -> Self {
        self.refresh_interval(Duration::from_millis(ms))
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// `StoreError::Configuration` if the store name is missing or the
    /// result fails [`RefreshConfig::validate`].
    pub fn build(self) -> Result<RefreshConfig> {
        let store_name = self
            .store_name
            .ok_or_else(|| StoreError::config("store name is required"))?;
        let config = RefreshConfig::new(
            store_name,
            self.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL),
        );
        config.validate()?;
        Ok(config)
    }
}

//! Component health registry.
//!
//! Schedulers register one component each and flip it as refreshes
//! succeed or fail. The registry is an ordinary value passed to whoever
//! needs it; there is no process-wide instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rotor_core::HealthStatus;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Health of one named component, as reported by [`HealthRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name.
    pub name: String,
    /// Whether the component is healthy.
    pub healthy: bool,
    /// Why the component is unhealthy, if it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Handle to one registered component.
#[derive(Debug, Clone)]
pub struct HealthComponent {
    name: Arc<str>,
    status: Arc<RwLock<HealthStatus>>,
}

impl HealthComponent {
    /// Returns the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the component healthy.
    pub fn set_healthy(&self) {
        *self.status.write() = HealthStatus::healthy();
    }

    /// Marks the component unhealthy with a reason.
    pub fn set_unhealthy(&self, reason: impl Into<String>) {
        *self.status.write() = HealthStatus::unhealthy(reason);
    }

    /// Returns the current status.
    pub fn status(&self) -> HealthStatus {
        self.status.read().clone()
    }

    /// Returns true if the component is healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.read().healthy
    }
}

/// Registry of health components.
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<BTreeMap<String, HealthComponent>>>,
}

impl HealthRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, initially unhealthy.
    ///
    /// Registering a name twice replaces the earlier component.
    pub fn register(&self, name: impl Into<String>) -> HealthComponent {
        let name = name.into();
        let component = HealthComponent {
            name: Arc::from(name.as_str()),
            status: Arc::new(RwLock::new(HealthStatus {
                healthy: false,
                reason: None,
            })),
        };

        if self
            .components
            .write()
            .insert(name.clone(), component.clone())
            .is_some()
        {
            warn!(component = %name, "Health component registered twice, replacing");
        }

        component
    }

    /// Returns the component registered under `name`.
    pub fn get(&self, name: &str) -> Option<HealthComponent> {
        self.components.read().get(name).cloned()
    }

    /// Returns the health of every component, ordered by name.
    pub fn snapshot(&self) -> Vec<ComponentHealth> {
        self.components
            .read()
            .values()
            .map(|c| {
                let status = c.status();
                ComponentHealth {
                    name: c.name().to_string(),
                    healthy: status.healthy,
                    reason: status.reason,
                }
            })
            .collect()
    }

    /// Returns true if every component is healthy.
    pub fn is_healthy(&self) -> bool {
        self.components.read().values().all(|c| c.is_healthy())
    }

    /// Returns the number of registered components.
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }
}

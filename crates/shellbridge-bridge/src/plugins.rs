// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered plugin registry.
//
// Plugins are declared before launch and initialised exactly once, in
// declaration order, during the launch registration pass. After that pass the
// registry is sealed.

use std::fmt;

use chrono::{DateTime, Utc};
use shellbridge_core::error::{BridgeError, Result};
use tracing::{debug, error, info};

use crate::traits::RuntimeHandler;

/// Initialisation function for a plugin. Receives the runtime it registers
/// with; an `Err` carries the failure reason.
pub type PluginInit =
    Box<dyn Fn(&dyn RuntimeHandler) -> std::result::Result<(), String> + Send + Sync>;

/// A plugin to be registered at launch.
pub struct PluginDescriptor {
    pub name: String,
    init: PluginInit,
}

impl PluginDescriptor {
    pub fn new<F>(name: impl Into<String>, init: F) -> Self
    where
        F: Fn(&dyn RuntimeHandler) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            init: Box::new(init),
        }
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A plugin that completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPlugin {
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// Where the registry is in its one-shot registration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryState {
    /// Declared but not yet registered.
    Pending,
    /// Every plugin registered. Immutable from here on.
    Sealed,
    /// The pass aborted on the named plugin. Never re-run.
    Failed { plugin: String, reason: String },
}

/// Plugin registry managing declared and registered plugins.
#[derive(Debug)]
pub struct PluginRegistry {
    declared: Vec<PluginDescriptor>,
    registered: Vec<RegisteredPlugin>,
    state: RegistryState,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
            registered: Vec::new(),
            state: RegistryState::Pending,
        }
    }

    /// Declare a plugin. Names must be unique.
    pub fn declare(&mut self, plugin: PluginDescriptor) -> Result<()> {
        if self.declared.iter().any(|p| p.name == plugin.name) {
            return Err(BridgeError::DuplicatePlugin(plugin.name));
        }
        debug!(plugin = %plugin.name, "plugin declared");
        self.declared.push(plugin);
        Ok(())
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn with<F>(mut self, name: impl Into<String>, init: F) -> Result<Self>
    where
        F: Fn(&dyn RuntimeHandler) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.declare(PluginDescriptor::new(name, init))?;
        Ok(self)
    }

    /// Run every plugin's init against `runtime`, in declared order.
    ///
    /// Stops at the first failure. A sealed registry returns immediately; a
    /// failed one reports the original failure again without re-running any
    /// plugin.
    pub fn register_all(&mut self, runtime: &dyn RuntimeHandler) -> Result<&[RegisteredPlugin]> {
        match &self.state {
            RegistryState::Sealed => return Ok(&self.registered),
            RegistryState::Failed { plugin, reason } => {
                return Err(BridgeError::FatalRegistration {
                    plugin: plugin.clone(),
                    reason: reason.clone(),
                });
            }
            RegistryState::Pending => {}
        }

        for plugin in &self.declared {
            if let Err(reason) = (plugin.init)(runtime) {
                error!(plugin = %plugin.name, %reason, "plugin registration failed");
                self.state = RegistryState::Failed {
                    plugin: plugin.name.clone(),
                    reason: reason.clone(),
                };
                return Err(BridgeError::FatalRegistration {
                    plugin: plugin.name.clone(),
                    reason,
                });
            }
            debug!(plugin = %plugin.name, "plugin registered");
            self.registered.push(RegisteredPlugin {
                name: plugin.name.clone(),
                registered_at: Utc::now(),
            });
        }

        self.state = RegistryState::Sealed;
        info!(count = self.registered.len(), "plugin registry sealed");
        Ok(&self.registered)
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn is_sealed(&self) -> bool {
        self.state == RegistryState::Sealed
    }

    /// Names of declared plugins, in declaration order.
    pub fn declared_names(&self) -> Vec<&str> {
        self.declared.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn registered(&self) -> &[RegisteredPlugin] {
        &self.registered
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.registered.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::stub::StubRuntime;

    fn recording(log: &Arc<Mutex<Vec<String>>>, name: &str) -> PluginDescriptor {
        let log = Arc::clone(log);
        let tag = name.to_string();
        PluginDescriptor::new(name, move |_| {
            log.lock().unwrap().push(tag.clone());
            Ok(())
        })
    }

    #[test]
    fn registers_in_declared_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut reg = PluginRegistry::new();
        for name in ["path_provider", "shared_preferences", "local_notifications"] {
            reg.declare(recording(&log, name)).unwrap();
        }

        let registered = reg.register_all(&StubRuntime::new()).unwrap();
        let names: Vec<_> = registered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["path_provider", "shared_preferences", "local_notifications"]);
        assert_eq!(
            *log.lock().unwrap(),
            ["path_provider", "shared_preferences", "local_notifications"]
        );
        assert!(reg.is_sealed());
    }

    #[test]
    fn duplicate_declaration_rejected() {
        let mut reg = PluginRegistry::new();
        reg.declare(PluginDescriptor::new("camera", |_| Ok(()))).unwrap();
        let err = reg
            .declare(PluginDescriptor::new("camera", |_| Ok(())))
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicatePlugin(name) if name == "camera"));
        assert_eq!(reg.declared_names(), ["camera"]);
    }

    #[test]
    fn sealed_registry_does_not_rerun() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut reg = PluginRegistry::new();
        reg.declare(recording(&log, "only")).unwrap();

        let runtime = StubRuntime::new();
        reg.register_all(&runtime).unwrap();
        reg.register_all(&runtime).unwrap();

        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(reg.registered().len(), 1);
    }

    #[test]
    fn failure_stops_the_pass() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut reg = PluginRegistry::new()
            .with("first", |_| Ok(()))
            .unwrap()
            .with("broken", |_| Err("missing entitlement".into()))
            .unwrap();
        reg.declare(recording(&log, "after")).unwrap();

        let runtime = StubRuntime::new();
        let err = reg.register_all(&runtime).unwrap_err();
        assert!(
            matches!(&err, BridgeError::FatalRegistration { plugin, reason }
                if plugin == "broken" && reason == "missing entitlement")
        );
        assert!(log.lock().unwrap().is_empty());
        assert!(reg.get("first").is_some());
        assert!(reg.get("after").is_none());

        // A second attempt reports the same failure without running anything.
        assert!(reg.register_all(&runtime).unwrap_err().is_fatal());
        assert!(log.lock().unwrap().is_empty());
        assert!(!reg.is_sealed());
    }

    #[test]
    fn empty_registry_seals() {
        let mut reg = PluginRegistry::new();
        assert!(reg.register_all(&StubRuntime::new()).unwrap().is_empty());
        assert_eq!(reg.state(), &RegistryState::Sealed);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatcher configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BridgeError, Result};
use crate::types::{HostVersion, OrientationSet};

/// Persistent dispatcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Lowest host OS version that supports the notification delegate slot.
    pub min_notification_version: HostVersion,
    /// Orientation policy in effect before the runtime changes it.
    pub default_orientations: OrientationSet,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            min_notification_version: HostVersion::new(10, 0, 0),
            default_orientations: OrientationSet::ALL_BUT_UPSIDE_DOWN,
            log_filter: None,
        }
    }
}

impl BridgeConfig {
    /// Reject configurations that would violate the non-empty policy rule.
    pub fn validate(&self) -> Result<()> {
        if self.default_orientations.is_empty() {
            return Err(BridgeError::InvalidPolicy);
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file is `Ok(None)` rather
    /// than an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(BridgeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unusable. Unusable files are reported with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        Self::resolve(path, Self::load_optional(path))
    }

    /// Turn the outcome of [`load_optional`](Self::load_optional) into a
    /// config, warning about unusable files. Lets callers load before a
    /// `tracing` subscriber exists and report once it does.
    pub fn resolve(path: &Path, loaded: Result<Option<Self>>) -> Self {
        match loaded {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable config file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Shellbridge.

use thiserror::Error;

/// Top-level error type for all Shellbridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Launch --
    /// A declared plugin failed to initialise. Startup cannot continue with a
    /// partially registered plugin set.
    #[error("plugin '{plugin}' failed to register: {reason}")]
    FatalRegistration { plugin: String, reason: String },

    #[error("plugin '{0}' is already declared")]
    DuplicatePlugin(String),

    // -- Policy --
    #[error("orientation policy must allow at least one orientation")]
    InvalidPolicy,

    // -- Host capabilities --
    #[error("invalid host version: {0:?}")]
    InvalidVersion(String),

    // -- Configuration persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Whether this error must abort process startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalRegistration { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_registration_failures_are_fatal() {
        let fatal = BridgeError::FatalRegistration {
            plugin: "camera".into(),
            reason: "no device".into(),
        };
        assert!(fatal.is_fatal());
        assert!(!BridgeError::InvalidPolicy.is_fatal());
        assert!(!BridgeError::DuplicatePlugin("camera".into()).is_fatal());
    }

    #[test]
    fn registration_error_names_the_plugin() {
        let err = BridgeError::FatalRegistration {
            plugin: "push".into(),
            reason: "token missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "plugin 'push' failed to register: token missing"
        );
    }
}

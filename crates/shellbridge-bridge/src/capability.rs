// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host capability negotiation.
//
// Optional host features are resolved once, when the dispatcher is built,
// into plain flags. Nothing downstream re-checks the host version.

use shellbridge_core::config::BridgeConfig;
use shellbridge_core::types::HostVersion;
use tracing::info;

/// What the host reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Human-readable platform name (e.g. "iOS", "Android").
    pub platform_name: String,
    pub os_version: HostVersion,
}

impl HostCapabilities {
    pub fn new(platform_name: impl Into<String>, os_version: HostVersion) -> Self {
        Self {
            platform_name: platform_name.into(),
            os_version,
        }
    }

    /// Resolve optional features against `config`.
    pub fn negotiate(&self, config: &BridgeConfig) -> NegotiatedCapabilities {
        let negotiated = NegotiatedCapabilities {
            notifications: self.os_version >= config.min_notification_version,
        };
        info!(
            platform = %self.platform_name,
            version = %self.os_version,
            notifications = negotiated.notifications,
            "host capabilities negotiated"
        );
        negotiated
    }
}

/// Feature flags fixed for the lifetime of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NegotiatedCapabilities {
    /// The host has a notification delegate slot.
    pub notifications: bool,
}

/// Platform name for the compile target, paired with the version the host
/// reported at startup.
pub fn detect_host(os_version: HostVersion) -> HostCapabilities {
    let platform_name = if cfg!(target_os = "ios") {
        "iOS"
    } else if cfg!(target_os = "android") {
        "Android"
    } else {
        // DESKTOP/CI: no mobile host, the simulator drives the dispatcher.
        "Desktop (stub)"
    };
    HostCapabilities::new(platform_name, os_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_gated_on_minimum_version() {
        let config = BridgeConfig::default();

        let old = HostCapabilities::new("iOS", HostVersion::new(9, 3, 5));
        assert!(!old.negotiate(&config).notifications);

        let exact = HostCapabilities::new("iOS", HostVersion::new(10, 0, 0));
        assert!(exact.negotiate(&config).notifications);

        let new = HostCapabilities::new("iOS", HostVersion::new(17, 2, 0));
        assert!(new.negotiate(&config).notifications);
    }

    #[test]
    fn minimum_comes_from_config() {
        let config = BridgeConfig {
            min_notification_version: HostVersion::new(13, 0, 0),
            ..BridgeConfig::default()
        };
        let host = HostCapabilities::new("Android", HostVersion::new(12, 0, 0));
        assert!(!host.negotiate(&config).notifications);
    }

    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    #[test]
    fn desktop_reports_stub_platform() {
        let host = detect_host(HostVersion::new(1, 0, 0));
        assert_eq!(host.platform_name, "Desktop (stub)");
    }
}

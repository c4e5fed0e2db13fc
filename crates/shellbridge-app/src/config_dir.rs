// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file location for the desktop simulator.

use std::path::PathBuf;

pub const CONFIG_FILE: &str = "bridge.json";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "SHELLBRIDGE_CONFIG";

/// Path of the dispatcher config file.
///
/// `SHELLBRIDGE_CONFIG` wins; otherwise `<config home>/shellbridge/bridge.json`.
/// On mobile the host passes its own path instead.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    config_home().join("shellbridge").join(CONFIG_FILE)
}

fn config_home() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from("/tmp")
}

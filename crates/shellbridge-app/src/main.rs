// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shellbridge — desktop host simulator.
//
// Entry point. Loads the dispatcher config, initialises logging, and runs one
// scripted process lifetime against the dispatcher.
//
// Usage: shellbridge [HOST_VERSION]   (default 17.0)

mod config_dir;
mod simulator;

use std::process::ExitCode;

use shellbridge_bridge::detect_host;
use shellbridge_core::types::HostVersion;
use shellbridge_core::BridgeConfig;

const DEFAULT_HOST_VERSION: HostVersion = HostVersion::new(17, 0, 0);

fn main() -> ExitCode {
    // Config is read before logging starts because it may carry the filter.
    let path = config_dir::config_path();
    let loaded = BridgeConfig::load_optional(&path);
    let filter = loaded
        .as_ref()
        .ok()
        .and_then(|c| c.as_ref())
        .and_then(|c| c.log_filter.clone())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("Shellbridge simulator starting");

    // Unusable files are warned about here, now that logging is up.
    let config = BridgeConfig::resolve(&path, loaded);

    let version = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<HostVersion>() {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "bad host version argument");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_HOST_VERSION,
    };

    match simulator::run(&config, detect_host(version)) {
        Ok(Some(record)) => {
            match serde_json::to_string_pretty(&record) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(error = %e, "could not render launch record"),
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            tracing::warn!("host finished without a launch record");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, fatal = e.is_fatal(), "simulation aborted");
            ExitCode::FAILURE
        }
    }
}

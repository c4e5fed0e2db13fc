// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub runtime for desktop/CI builds where no UI runtime is embedded.
//
// Accepts every launch (unless told otherwise), records what it receives, and
// exposes no notification delegate unless one is attached.

use std::sync::{Arc, Mutex, PoisonError};

use shellbridge_core::types::{LaunchOptions, LifecycleEvent};

use crate::traits::{NotificationDelegate, RuntimeHandler};

/// Recording runtime used by the simulator and in tests.
pub struct StubRuntime {
    accept: bool,
    delegate: Option<Arc<dyn NotificationDelegate>>,
    launches: Mutex<Vec<LaunchOptions>>,
    events: Mutex<Vec<LifecycleEvent>>,
}

impl Default for StubRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StubRuntime {
    pub fn new() -> Self {
        Self {
            accept: true,
            delegate: None,
            launches: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// A runtime that declines every launch.
    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::new()
        }
    }

    /// Offer `delegate` at launch.
    pub fn with_delegate(mut self, delegate: Arc<dyn NotificationDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Options of every `accept_launch` call received.
    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lifecycle events received, oldest first.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RuntimeHandler for StubRuntime {
    fn accept_launch(&self, options: &LaunchOptions) -> bool {
        tracing::debug!(options = options.len(), accept = self.accept, "stub runtime launch");
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(options.clone());
        self.accept
    }

    fn on_lifecycle(&self, event: &LifecycleEvent) {
        tracing::debug!(event = event.name(), "stub runtime lifecycle");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn notification_delegate(&self) -> Option<Arc<dyn NotificationDelegate>> {
        self.delegate.clone()
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted desktop host.
//
// Plays the part of the mobile OS: launches the dispatcher, asks for
// orientations, cycles foreground/background, delivers a notification and
// terminates. The demo runtime reacts the way an embedded UI engine would,
// including pushing a new orientation policy back through `RuntimeControl`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use serde_json::json;
use shellbridge_bridge::{
    Dispatcher, HostCallbacks, HostCapabilities, NotificationDelegate, PluginRegistry,
    RuntimeControl, RuntimeHandler,
};
use shellbridge_core::error::Result;
use shellbridge_core::types::{
    LaunchOptions, LaunchRecord, LifecycleEvent, Notification, NotificationResponse,
    OrientationContext, OrientationSet, PresentationOptions, ResponseOutcome,
};
use shellbridge_core::BridgeConfig;
use tracing::info;

/// Plugins the demo app ships with, in registration order.
pub const DEMO_PLUGINS: [&str; 3] = ["path_provider", "shared_preferences", "local_notifications"];

/// Notification handling of the demo runtime.
#[derive(Default)]
struct DemoNotifications {
    opened: Mutex<Vec<String>>,
}

impl NotificationDelegate for DemoNotifications {
    fn will_present(&self, notification: &Notification) -> PresentationOptions {
        info!(
            id = %notification.id,
            title = ?notification.title,
            "runtime presenting notification"
        );
        PresentationOptions {
            sound: true,
            ..PresentationOptions::silent()
        }
    }

    fn did_receive_response(&self, response: &NotificationResponse) -> ResponseOutcome {
        info!(
            id = %response.notification.id,
            action = %response.action_id,
            "runtime handled response"
        );
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(response.notification.id.clone());
        ResponseOutcome::Handled
    }
}

/// Stand-in for an embedded UI engine. Locks to landscape while in the
/// foreground after a "video" launch option is seen.
pub struct DemoRuntime {
    control: OnceLock<Weak<Dispatcher>>,
    notifications: Arc<DemoNotifications>,
    landscape_on_foreground: AtomicBool,
}

impl DemoRuntime {
    pub fn new() -> Self {
        Self {
            control: OnceLock::new(),
            notifications: Arc::new(DemoNotifications::default()),
            landscape_on_foreground: AtomicBool::new(false),
        }
    }

    /// Hand the runtime its way back into the dispatcher.
    pub fn attach(&self, dispatcher: &Arc<Dispatcher>) {
        let _ = self.control.set(Arc::downgrade(dispatcher));
    }

    fn control(&self) -> Option<Arc<Dispatcher>> {
        self.control.get().and_then(Weak::upgrade)
    }

    /// Notification ids the user opened.
    pub fn opened(&self) -> Vec<String> {
        self.notifications
            .opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for DemoRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeHandler for DemoRuntime {
    fn accept_launch(&self, options: &LaunchOptions) -> bool {
        let video = options.get("mode").and_then(|v| v.as_str()) == Some("video");
        self.landscape_on_foreground.store(video, Ordering::SeqCst);
        info!(options = %json!(options), "runtime accepted launch");
        true
    }

    fn on_lifecycle(&self, event: &LifecycleEvent) {
        info!(event = event.name(), "runtime lifecycle");
        let landscape = self.landscape_on_foreground.load(Ordering::SeqCst);
        if *event == LifecycleEvent::Foreground && landscape {
            if let Some(control) = self.control() {
                if let Err(e) = control.set_orientation_policy(OrientationSet::LANDSCAPE) {
                    tracing::warn!(error = %e, "runtime could not lock landscape");
                }
            }
        }
    }

    fn notification_delegate(&self) -> Option<Arc<dyn NotificationDelegate>> {
        let delegate: Arc<dyn NotificationDelegate> = self.notifications.clone();
        Some(delegate)
    }
}

fn demo_plugins() -> Result<PluginRegistry> {
    let mut registry = PluginRegistry::new();
    for name in DEMO_PLUGINS {
        registry = registry.with(name, move |_runtime| {
            tracing::debug!(plugin = name, "plugin init");
            Ok(())
        })?;
    }
    Ok(registry)
}

/// Drive a dispatcher through one full process lifetime.
///
/// Returns the launch record so the caller can report it.
pub fn run(config: &BridgeConfig, host: HostCapabilities) -> Result<Option<LaunchRecord>> {
    let runtime = Arc::new(DemoRuntime::new());
    let dispatcher = Arc::new(Dispatcher::new(
        config,
        host,
        runtime.clone(),
        demo_plugins()?,
    )?);
    runtime.attach(&dispatcher);

    let options = LaunchOptions::from([("mode".to_string(), json!("video"))]);
    let accepted = dispatcher.on_launch(options)?;
    info!(accepted, "host: launch returned");

    let ctx = OrientationContext::window("main");
    info!(allowed = ?dispatcher.query_allowed_orientations(&ctx), "host: layout pass");

    dispatcher.on_foreground();
    info!(allowed = ?dispatcher.query_allowed_orientations(&ctx), "host: layout pass");

    let mut notification = Notification::new("welcome");
    notification.title = Some("Welcome back".into());
    let presentation = dispatcher.on_notification_present(&notification);
    info!(?presentation, "host: presenting notification");

    let outcome = dispatcher.on_notification_response(&NotificationResponse {
        notification,
        action_id: "open".into(),
        user_text: None,
    });
    info!(?outcome, "host: notification response delivered");

    dispatcher.on_background();
    dispatcher.on_terminate();
    info!(opened = runtime.opened().len(), "host: process terminated");

    Ok(dispatcher.launch_record())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellbridge_core::types::HostVersion;

    #[test]
    fn full_lifetime_on_modern_host() {
        let host = HostCapabilities::new("test", HostVersion::new(17, 0, 0));
        let record = run(&BridgeConfig::default(), host).unwrap().unwrap();

        assert!(record.accepted);
        assert_eq!(record.plugins, DEMO_PLUGINS);
        assert!(record.notifications_installed);
    }

    #[test]
    fn legacy_host_runs_without_notifications() {
        let host = HostCapabilities::new("test", HostVersion::new(9, 0, 0));
        let record = run(&BridgeConfig::default(), host).unwrap().unwrap();

        assert!(record.accepted);
        assert!(!record.notifications_installed);
    }

    #[test]
    fn runtime_locks_landscape_on_foreground() {
        let runtime = Arc::new(DemoRuntime::new());
        let dispatcher = Arc::new(
            Dispatcher::new(
                &BridgeConfig::default(),
                HostCapabilities::new("test", HostVersion::new(17, 0, 0)),
                runtime.clone(),
                PluginRegistry::new(),
            )
            .unwrap(),
        );
        runtime.attach(&dispatcher);

        let options = LaunchOptions::from([("mode".to_string(), json!("video"))]);
        dispatcher.on_launch(options).unwrap();
        let ctx = OrientationContext::default();
        assert_eq!(
            dispatcher.query_allowed_orientations(&ctx),
            OrientationSet::ALL_BUT_UPSIDE_DOWN
        );

        dispatcher.on_background();
        dispatcher.on_foreground();
        assert_eq!(dispatcher.query_allowed_orientations(&ctx), OrientationSet::LANDSCAPE);
    }

    #[test]
    fn opened_notifications_recorded() {
        let runtime = Arc::new(DemoRuntime::new());
        let dispatcher = Dispatcher::new(
            &BridgeConfig::default(),
            HostCapabilities::new("test", HostVersion::new(17, 0, 0)),
            runtime.clone(),
            PluginRegistry::new(),
        )
        .unwrap();
        dispatcher.on_launch(LaunchOptions::new()).unwrap();

        let outcome = dispatcher.on_notification_response(&NotificationResponse {
            notification: Notification::new("promo"),
            action_id: "open".into(),
            user_text: None,
        });
        assert_eq!(outcome, ResponseOutcome::Handled);
        assert_eq!(runtime.opened(), ["promo"]);
    }
}

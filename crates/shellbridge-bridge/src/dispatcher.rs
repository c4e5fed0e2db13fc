// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The platform bridge dispatcher.
//
// One instance per process. The host drives it through `HostCallbacks`; the
// runtime talks back through `RuntimeControl`. Every operation is
// synchronous and returns promptly.
//
// Locking: no dispatcher lock is held while calling into the runtime, a
// plugin init, or a notification delegate, so all of them may call back into
// the dispatcher. The one-shot launch pass is serialised by a state flag and
// a condvar rather than by holding a lock across it.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use chrono::Utc;
use shellbridge_core::config::BridgeConfig;
use shellbridge_core::error::Result;
use shellbridge_core::types::{
    LaunchOptions, LaunchRecord, LifecycleEvent, LifecyclePhase, Notification,
    NotificationResponse, OrientationContext, OrientationSet, PresentationOptions,
    ResponseOutcome, SessionId,
};
use tracing::{debug, info, trace, warn};

use crate::capability::{HostCapabilities, NegotiatedCapabilities};
use crate::notifications::NotificationSlot;
use crate::plugins::{PluginRegistry, RegisteredPlugin};
use crate::policy::OrientationPolicy;
use crate::traits::{HostCallbacks, NotificationDelegate, RuntimeControl, RuntimeHandler};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Progress of the one-shot launch pass.
#[derive(Debug)]
enum LaunchState {
    Idle,
    /// A pass is running on the given thread.
    InFlight(ThreadId),
    Done(LaunchRecord),
}

/// Holds the plugin registry while a launch pass runs unlocked.
///
/// Dropping it (normally or while unwinding) returns the registry and either
/// publishes the launch record or reopens the gate, then wakes waiters.
struct LaunchPass<'a> {
    dispatcher: &'a Dispatcher,
    registry: Option<PluginRegistry>,
    record: Option<LaunchRecord>,
}

impl LaunchPass<'_> {
    fn restore_registry(&mut self) {
        if let Some(registry) = self.registry.take() {
            *lock(&self.dispatcher.registry) = registry;
        }
    }
}

impl Drop for LaunchPass<'_> {
    fn drop(&mut self) {
        self.restore_registry();
        let mut state = lock(&self.dispatcher.launch);
        *state = match self.record.take() {
            Some(record) => LaunchState::Done(record),
            None => LaunchState::Idle,
        };
        self.dispatcher.launch_done.notify_all();
    }
}

/// Routes host lifecycle and capability callbacks to the UI runtime.
pub struct Dispatcher {
    host: HostCapabilities,
    capabilities: NegotiatedCapabilities,
    runtime: Arc<dyn RuntimeHandler>,
    policy: OrientationPolicy,
    notifications: NotificationSlot,
    registry: Mutex<PluginRegistry>,
    launch: Mutex<LaunchState>,
    launch_done: Condvar,
    phase: Mutex<LifecyclePhase>,
}

impl Dispatcher {
    /// Build a dispatcher for `host`.
    ///
    /// Negotiates host capabilities against `config` and seeds the
    /// orientation policy from `config.default_orientations`.
    pub fn new(
        config: &BridgeConfig,
        host: HostCapabilities,
        runtime: Arc<dyn RuntimeHandler>,
        plugins: PluginRegistry,
    ) -> Result<Self> {
        config.validate()?;
        let capabilities = host.negotiate(config);
        Ok(Self {
            host,
            capabilities,
            runtime,
            policy: OrientationPolicy::new(config.default_orientations)?,
            notifications: NotificationSlot::new(),
            registry: Mutex::new(plugins),
            launch: Mutex::new(LaunchState::Idle),
            launch_done: Condvar::new(),
            phase: Mutex::new(LifecyclePhase::NotLaunched),
        })
    }

    pub fn capabilities(&self) -> NegotiatedCapabilities {
        self.capabilities
    }

    pub fn phase(&self) -> LifecyclePhase {
        *lock(&self.phase)
    }

    /// The first successful launch, if it has completed.
    pub fn launch_record(&self) -> Option<LaunchRecord> {
        match &*lock(&self.launch) {
            LaunchState::Done(record) => Some(record.clone()),
            LaunchState::Idle | LaunchState::InFlight(_) => None,
        }
    }

    pub fn registered_plugins(&self) -> Vec<RegisteredPlugin> {
        lock(&self.registry).registered().to_vec()
    }

    pub fn has_notification_delegate(&self) -> bool {
        self.notifications.is_occupied()
    }

    /// Install the runtime's own delegate, if the host supports one and the
    /// runtime offers one. A runtime without a delegate is not an error.
    fn install_runtime_delegate(&self) -> bool {
        if !self.capabilities.notifications {
            debug!(
                version = %self.host.os_version,
                "host lacks notification delegate slot, skipping"
            );
            return false;
        }
        match self.runtime.notification_delegate() {
            Some(delegate) => {
                self.notifications.set(Some(&delegate));
                true
            }
            None => {
                debug!("runtime offers no notification delegate, host defaults apply");
                false
            }
        }
    }

    /// Advance the lifecycle phase. Returns false when the event does not
    /// apply in the current phase.
    fn transition(&self, event: &LifecycleEvent) -> bool {
        let mut phase = lock(&self.phase);
        match phase.apply(event) {
            Some(next) => {
                debug!(event = event.name(), from = ?*phase, to = ?next, "lifecycle transition");
                *phase = next;
                true
            }
            None => {
                warn!(event = event.name(), phase = ?*phase, "lifecycle event dropped");
                false
            }
        }
    }

    fn forward(&self, event: LifecycleEvent) {
        if !self.transition(&event) {
            return;
        }
        if event == LifecycleEvent::Terminate {
            self.notifications.clear();
        }
        self.runtime.on_lifecycle(&event);
    }

    /// Claim the launch gate. `Err` carries the answer for a caller that must
    /// not run the pass itself.
    fn begin_launch(&self) -> std::result::Result<LaunchPass<'_>, bool> {
        let me = thread::current().id();
        let mut state = lock(&self.launch);
        loop {
            match &*state {
                LaunchState::Done(existing) => {
                    warn!(session = %existing.session, "launch already handled, ignoring");
                    return Err(existing.accepted);
                }
                LaunchState::InFlight(owner) if *owner == me => {
                    warn!("launch re-entered from inside the launch pass, ignoring");
                    return Err(false);
                }
                LaunchState::InFlight(_) => {
                    state = self
                        .launch_done
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                LaunchState::Idle => {
                    *state = LaunchState::InFlight(me);
                    break;
                }
            }
        }
        drop(state);

        let registry = std::mem::take(&mut *lock(&self.registry));
        Ok(LaunchPass {
            dispatcher: self,
            registry: Some(registry),
            record: None,
        })
    }
}

impl HostCallbacks for Dispatcher {
    /// A second call is a no-op that returns the first launch's result; a
    /// call made while another thread is launching waits for that result. A
    /// call made from inside the launch pass itself (a plugin init or
    /// `accept_launch`) returns `false` at once.
    ///
    /// If the first launch failed registration, the same `FatalRegistration`
    /// is returned again and no plugin is re-run.
    fn on_launch(&self, options: LaunchOptions) -> Result<bool> {
        let mut pass = match self.begin_launch() {
            Ok(pass) => pass,
            Err(accepted) => return Ok(accepted),
        };

        let plugins: Vec<String> = match pass.registry.as_mut() {
            Some(registry) => registry
                .register_all(self.runtime.as_ref())?
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            None => Vec::new(),
        };
        pass.restore_registry();

        let notifications_installed = self.install_runtime_delegate();
        let accepted = self.runtime.accept_launch(&options);
        self.transition(&LifecycleEvent::Launch { options });

        let launched = LaunchRecord {
            session: SessionId::new(),
            launched_at: Utc::now(),
            accepted,
            plugins,
            notifications_installed,
        };
        info!(
            session = %launched.session,
            plugins = launched.plugins.len(),
            notifications = notifications_installed,
            accepted,
            "launch complete"
        );
        pass.record = Some(launched);
        Ok(accepted)
    }

    fn on_foreground(&self) {
        self.forward(LifecycleEvent::Foreground);
    }

    fn on_background(&self) {
        self.forward(LifecycleEvent::Background);
    }

    fn on_terminate(&self) {
        self.forward(LifecycleEvent::Terminate);
    }

    fn query_allowed_orientations(&self, context: &OrientationContext) -> OrientationSet {
        let allowed = self.policy.current();
        trace!(window = ?context.window_id, ?allowed, "orientation query");
        allowed
    }

    fn on_notification_present(&self, notification: &Notification) -> PresentationOptions {
        self.notifications.present(notification)
    }

    fn on_notification_response(&self, response: &NotificationResponse) -> ResponseOutcome {
        self.notifications.respond(response)
    }
}

impl RuntimeControl for Dispatcher {
    fn set_orientation_policy(&self, orientations: OrientationSet) -> Result<()> {
        match self.policy.replace(orientations) {
            Ok(previous) => {
                info!(from = ?previous, to = ?orientations, "orientation policy updated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "orientation policy update rejected");
                Err(e)
            }
        }
    }

    /// Ignored once the process has terminated: terminate tears the slot
    /// down for good.
    fn register_notification_delegate(&self, delegate: Option<&Arc<dyn NotificationDelegate>>) {
        if !self.capabilities.notifications {
            debug!("host lacks notification delegate slot, registration ignored");
            return;
        }
        if self.phase() == LifecyclePhase::Terminated {
            warn!("notification delegate registered after terminate, ignoring");
            return;
        }
        debug!(installed = delegate.is_some(), "notification delegate registered");
        self.notifications.set(delegate);
    }
}

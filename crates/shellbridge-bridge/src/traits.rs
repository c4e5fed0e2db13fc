// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait seams between the host OS, the dispatcher, and the UI runtime.
//
// The host never subclasses anything: it holds a `HostCallbacks` reference
// and calls into it. The runtime holds a `RuntimeControl` reference for the
// few operations it is allowed to perform back.

use std::sync::Arc;

use shellbridge_core::error::Result;
use shellbridge_core::types::{
    LaunchOptions, LifecycleEvent, Notification, NotificationResponse, OrientationContext,
    OrientationSet, PresentationOptions, ResponseOutcome,
};

/// Everything the host operating system may invoke on the dispatcher.
pub trait HostCallbacks: Send + Sync {
    /// Process launch. Registers plugins, installs the notification delegate
    /// where supported, and reports whether the runtime accepted the launch.
    fn on_launch(&self, options: LaunchOptions) -> Result<bool>;

    fn on_foreground(&self);

    fn on_background(&self);

    fn on_terminate(&self);

    /// Called from the host's synchronous layout path. Must not block.
    fn query_allowed_orientations(&self, context: &OrientationContext) -> OrientationSet;

    fn on_notification_present(&self, notification: &Notification) -> PresentationOptions;

    fn on_notification_response(&self, response: &NotificationResponse) -> ResponseOutcome;
}

/// Operations the UI runtime may perform on the dispatcher.
pub trait RuntimeControl: Send + Sync {
    /// Replace the orientation policy. Empty sets are rejected with
    /// `BridgeError::InvalidPolicy` and the previous policy is kept.
    fn set_orientation_policy(&self, orientations: OrientationSet) -> Result<()>;

    /// Install or clear the notification delegate. Last writer wins.
    ///
    /// Only a weak reference is kept: the caller owns the delegate.
    fn register_notification_delegate(&self, delegate: Option<&Arc<dyn NotificationDelegate>>);
}

/// The embedded UI runtime that consumes bridged events.
pub trait RuntimeHandler: Send + Sync {
    /// Final step of launch, after every plugin registered.
    fn accept_launch(&self, options: &LaunchOptions) -> bool;

    /// Foreground, background and terminate transitions.
    fn on_lifecycle(&self, event: &LifecycleEvent);

    /// Delegate to install at launch, if the runtime handles notifications.
    ///
    /// The dispatcher keeps only a weak reference, so the runtime must keep
    /// the returned delegate alive itself.
    fn notification_delegate(&self) -> Option<Arc<dyn NotificationDelegate>> {
        None
    }
}

/// Receives foreground notifications and user responses.
pub trait NotificationDelegate: Send + Sync {
    fn will_present(&self, notification: &Notification) -> PresentationOptions;

    fn did_receive_response(&self, response: &NotificationResponse) -> ResponseOutcome;
}

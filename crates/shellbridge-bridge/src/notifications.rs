// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-slot notification delegate holder.
//
// Lifecycle: empty at construction, filled at launch (or later by the
// runtime), replaced by any later registration, cleared on terminate. Only a
// weak reference is stored; a delegate dropped by its owner behaves as if the
// slot were empty.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use shellbridge_core::types::{
    Notification, NotificationResponse, PresentationOptions, ResponseOutcome,
};
use tracing::debug;

use crate::traits::NotificationDelegate;

#[derive(Default)]
pub struct NotificationSlot {
    delegate: Mutex<Option<Weak<dyn NotificationDelegate>>>,
}

impl std::fmt::Debug for NotificationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSlot")
            .field("occupied", &self.is_occupied())
            .finish()
    }
}

impl NotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `delegate`, replacing any previous one. `None` clears.
    pub fn set(&self, delegate: Option<&Arc<dyn NotificationDelegate>>) {
        let mut slot = self.delegate.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = delegate.map(Arc::downgrade);
    }

    pub fn clear(&self) {
        self.set(None);
    }

    /// Whether a live delegate is installed.
    pub fn is_occupied(&self) -> bool {
        self.live().is_some()
    }

    /// Upgrade the stored reference. The lock is released before the caller
    /// invokes the delegate.
    fn live(&self) -> Option<Arc<dyn NotificationDelegate>> {
        let slot = self.delegate.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().and_then(Weak::upgrade)
    }

    pub fn present(&self, notification: &Notification) -> PresentationOptions {
        match self.live() {
            Some(delegate) => delegate.will_present(notification),
            None => {
                debug!(id = %notification.id, "no notification delegate, presenting silently");
                PresentationOptions::silent()
            }
        }
    }

    pub fn respond(&self, response: &NotificationResponse) -> ResponseOutcome {
        match self.live() {
            Some(delegate) => delegate.did_receive_response(response),
            None => {
                debug!(
                    id = %response.notification.id,
                    action = %response.action_id,
                    "no notification delegate, response ignored"
                );
                ResponseOutcome::NoAction
            }
        }
    }
}

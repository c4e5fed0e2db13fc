// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Shellbridge — platform bridge dispatcher.
//!
//! The host operating system calls into a [`Dispatcher`] through
//! [`HostCallbacks`] for lifecycle transitions, orientation queries and
//! notification callbacks. The dispatcher registers plugins once at launch,
//! forwards normalised events to the embedded [`RuntimeHandler`], and answers
//! capability queries from its own policy state.
//!
//! Mobile hosts wire their native delegate callbacks to `HostCallbacks`;
//! desktop and CI builds pair the dispatcher with [`stub::StubRuntime`].

pub mod capability;
pub mod dispatcher;
pub mod notifications;
pub mod plugins;
pub mod policy;
pub mod stub;
pub mod traits;

pub use capability::{HostCapabilities, NegotiatedCapabilities, detect_host};
pub use dispatcher::Dispatcher;
pub use plugins::{PluginDescriptor, PluginRegistry};
pub use traits::{HostCallbacks, NotificationDelegate, RuntimeControl, RuntimeHandler};

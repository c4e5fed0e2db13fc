// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Shellbridge dispatcher.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BridgeError;

/// Unique identifier for one launch of the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// A physical screen orientation the UI may be presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    PortraitUp,
    /// Upside down. Excluded from the default policy.
    PortraitDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::PortraitUp,
        Orientation::PortraitDown,
        Orientation::LandscapeLeft,
        Orientation::LandscapeRight,
    ];

    const fn bit(self) -> u8 {
        match self {
            Orientation::PortraitUp => 1 << 0,
            Orientation::PortraitDown => 1 << 1,
            Orientation::LandscapeLeft => 1 << 2,
            Orientation::LandscapeRight => 1 << 3,
        }
    }
}

/// A set of orientations, stored as a bit mask.
///
/// Serialises as a list of orientation names so config files stay readable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Orientation>", into = "Vec<Orientation>")]
pub struct OrientationSet(u8);

impl OrientationSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b1111);
    pub const ALL_BUT_UPSIDE_DOWN: Self = Self(0b1101);
    pub const PORTRAIT: Self = Self(0b0001);
    pub const LANDSCAPE: Self = Self(0b1100);

    pub fn from_orientations<I: IntoIterator<Item = Orientation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |mut set, o| {
            set.insert(o);
            set
        })
    }

    pub fn contains(self, orientation: Orientation) -> bool {
        self.0 & orientation.bit() != 0
    }

    pub fn insert(&mut self, orientation: Orientation) {
        self.0 |= orientation.bit();
    }

    pub fn remove(&mut self, orientation: Orientation) {
        self.0 &= !orientation.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Orientations in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Orientation> {
        Orientation::ALL.into_iter().filter(move |o| self.contains(*o))
    }
}

impl fmt::Debug for OrientationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Vec<Orientation>> for OrientationSet {
    fn from(list: Vec<Orientation>) -> Self {
        Self::from_orientations(list)
    }
}

impl From<OrientationSet> for Vec<Orientation> {
    fn from(set: OrientationSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Orientation> for OrientationSet {
    fn from_iter<I: IntoIterator<Item = Orientation>>(iter: I) -> Self {
        Self::from_orientations(iter)
    }
}

/// The window or scene a host is laying out when it asks for orientations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrientationContext {
    pub window_id: Option<String>,
}

impl OrientationContext {
    pub fn window(id: impl Into<String>) -> Self {
        Self {
            window_id: Some(id.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Options the host passes alongside a launch. Values are opaque to the
/// dispatcher and forwarded to the runtime untouched.
pub type LaunchOptions = BTreeMap<String, serde_json::Value>;

/// Normalised host lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    Launch { options: LaunchOptions },
    Foreground,
    Background,
    Terminate,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Launch { .. } => "launch",
            LifecycleEvent::Foreground => "foreground",
            LifecycleEvent::Background => "background",
            LifecycleEvent::Terminate => "terminate",
        }
    }
}

/// Where the process is in its lifecycle, as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    /// No successful launch yet.
    NotLaunched,
    /// Launched and in the foreground.
    Active,
    /// Launched and backgrounded.
    Background,
    /// Terminated. Terminal state.
    Terminated,
}

impl LifecyclePhase {
    /// Phase reached by applying `event`, or `None` if the event does not
    /// apply in this phase and must be dropped.
    pub fn apply(self, event: &LifecycleEvent) -> Option<LifecyclePhase> {
        use LifecycleEvent as E;
        use LifecyclePhase as P;
        match (self, event) {
            (P::NotLaunched, E::Launch { .. }) => Some(P::Active),
            (P::Active | P::Background, E::Foreground) => Some(P::Active),
            (P::Active | P::Background, E::Background) => Some(P::Background),
            (P::Active | P::Background, E::Terminate) => Some(P::Terminated),
            _ => None,
        }
    }
}

/// Record of the first launch, kept for the lifetime of the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub session: SessionId,
    pub launched_at: DateTime<Utc>,
    /// Whether the runtime accepted the launch.
    pub accepted: bool,
    /// Plugin names in the order they were registered.
    pub plugins: Vec<String>,
    pub notifications_installed: bool,
}

// ---------------------------------------------------------------------------
// Host version
// ---------------------------------------------------------------------------

/// Host operating system version used for capability gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for HostVersion {
    type Err = BridgeError;

    /// Accepts `"17"`, `"17.2"` or `"17.2.1"`; missing parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BridgeError::InvalidVersion(s.to_string());
        let mut parts = [0u32; 3];
        for (i, piece) in s.trim().split('.').enumerate() {
            if i >= parts.len() {
                return Err(invalid());
            }
            parts[i] = piece.parse().map_err(|_| invalid())?;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl TryFrom<String> for HostVersion {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HostVersion> for String {
    fn from(v: HostVersion) -> Self {
        v.to_string()
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A notification the host is about to present while the app is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub user_info: BTreeMap<String, serde_json::Value>,
    pub delivered_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: None,
            user_info: BTreeMap::new(),
            delivered_at: Utc::now(),
        }
    }
}

/// The user's interaction with a delivered notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification: Notification,
    /// Host action identifier, e.g. the default tap or a custom action.
    pub action_id: String,
    /// Text entered in a reply action, if any.
    pub user_text: Option<String>,
}

/// How the host should present a foreground notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOptions {
    pub banner: bool,
    pub list: bool,
    pub sound: bool,
    pub badge: bool,
}

impl PresentationOptions {
    /// Shown without sound or badge. Used when no delegate is registered.
    pub const fn silent() -> Self {
        Self {
            banner: true,
            list: true,
            sound: false,
            badge: false,
        }
    }

    /// Not presented at all.
    pub const fn none() -> Self {
        Self {
            banner: false,
            list: false,
            sound: false,
            badge: false,
        }
    }
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self::silent()
    }
}

/// Result of handling a notification response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseOutcome {
    /// The delegate handled the response.
    Handled,
    /// Nothing was done. Default when no delegate is registered.
    NoAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mask_excludes_upside_down() {
        let set = OrientationSet::ALL_BUT_UPSIDE_DOWN;
        assert!(set.contains(Orientation::PortraitUp));
        assert!(!set.contains(Orientation::PortraitDown));
        assert!(set.contains(Orientation::LandscapeLeft));
        assert!(set.contains(Orientation::LandscapeRight));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn set_insert_remove() {
        let mut set = OrientationSet::EMPTY;
        assert!(set.is_empty());
        set.insert(Orientation::LandscapeLeft);
        set.insert(Orientation::LandscapeRight);
        assert_eq!(set, OrientationSet::LANDSCAPE);
        set.remove(Orientation::LandscapeLeft);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Orientation::LandscapeRight]);
    }

    #[test]
    fn set_serialises_as_names() {
        let json = serde_json::to_string(&OrientationSet::LANDSCAPE).unwrap();
        assert_eq!(json, r#"["LandscapeLeft","LandscapeRight"]"#);
        let back: OrientationSet = serde_json::from_str(r#"["PortraitUp"]"#).unwrap();
        assert_eq!(back, OrientationSet::PORTRAIT);
    }

    #[test]
    fn version_parsing() {
        assert_eq!("17".parse::<HostVersion>().unwrap(), HostVersion::new(17, 0, 0));
        assert_eq!("9.3".parse::<HostVersion>().unwrap(), HostVersion::new(9, 3, 0));
        assert_eq!(" 10.0.1 ".parse::<HostVersion>().unwrap(), HostVersion::new(10, 0, 1));
        assert!("".parse::<HostVersion>().is_err());
        assert!("ten".parse::<HostVersion>().is_err());
        assert!("1.2.3.4".parse::<HostVersion>().is_err());
    }

    #[test]
    fn version_ordering_gates_features() {
        let min = HostVersion::new(10, 0, 0);
        assert!(HostVersion::new(9, 3, 5) < min);
        assert!(HostVersion::new(10, 0, 0) >= min);
        assert!(HostVersion::new(16, 4, 0) > min);
    }

    #[test]
    fn lifecycle_transitions() {
        let launch = LifecycleEvent::Launch {
            options: LaunchOptions::new(),
        };
        assert_eq!(
            LifecyclePhase::NotLaunched.apply(&launch),
            Some(LifecyclePhase::Active)
        );
        assert_eq!(LifecyclePhase::NotLaunched.apply(&LifecycleEvent::Foreground), None);
        assert_eq!(
            LifecyclePhase::Active.apply(&LifecycleEvent::Background),
            Some(LifecyclePhase::Background)
        );
        assert_eq!(
            LifecyclePhase::Background.apply(&LifecycleEvent::Terminate),
            Some(LifecyclePhase::Terminated)
        );
        assert_eq!(LifecyclePhase::Terminated.apply(&LifecycleEvent::Foreground), None);
        assert_eq!(LifecyclePhase::Active.apply(&launch), None);
    }

    #[test]
    fn lifecycle_event_json_is_tagged() {
        let json = serde_json::to_value(LifecycleEvent::Background).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "background" }));
    }
}

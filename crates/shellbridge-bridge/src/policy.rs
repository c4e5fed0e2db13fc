// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide orientation policy.
//
// Read on every host layout pass, written rarely by the runtime. The guarded
// value is `Copy`, so readers hold the lock only long enough to copy it and a
// poisoned lock still yields a valid set.

use std::sync::{PoisonError, RwLock};

use shellbridge_core::error::{BridgeError, Result};
use shellbridge_core::types::OrientationSet;

/// The set of orientations the UI may currently be presented in. Never empty.
#[derive(Debug)]
pub struct OrientationPolicy {
    allowed: RwLock<OrientationSet>,
}

impl Default for OrientationPolicy {
    fn default() -> Self {
        Self {
            allowed: RwLock::new(OrientationSet::ALL_BUT_UPSIDE_DOWN),
        }
    }
}

impl OrientationPolicy {
    /// Create a policy starting at `initial`.
    pub fn new(initial: OrientationSet) -> Result<Self> {
        if initial.is_empty() {
            return Err(BridgeError::InvalidPolicy);
        }
        Ok(Self {
            allowed: RwLock::new(initial),
        })
    }

    pub fn current(&self) -> OrientationSet {
        *self.allowed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically replace the policy. Returns the previous set.
    pub fn replace(&self, orientations: OrientationSet) -> Result<OrientationSet> {
        if orientations.is_empty() {
            return Err(BridgeError::InvalidPolicy);
        }
        let mut guard = self.allowed.write().unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::replace(&mut *guard, orientations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellbridge_core::types::Orientation;

    #[test]
    fn defaults_to_all_but_upside_down() {
        let policy = OrientationPolicy::default();
        let expected: OrientationSet = [
            Orientation::PortraitUp,
            Orientation::LandscapeLeft,
            Orientation::LandscapeRight,
        ]
        .into_iter()
        .collect();
        assert_eq!(policy.current(), expected);
    }

    #[test]
    fn every_non_empty_set_round_trips() {
        let policy = OrientationPolicy::default();
        for bits in 1u8..16 {
            let set: OrientationSet = Orientation::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, o)| o)
                .collect();
            policy.replace(set).unwrap();
            assert_eq!(policy.current(), set);
        }
    }

    #[test]
    fn empty_set_rejected_and_prior_kept() {
        let policy = OrientationPolicy::default();
        policy.replace(OrientationSet::LANDSCAPE).unwrap();

        assert!(matches!(
            policy.replace(OrientationSet::EMPTY),
            Err(BridgeError::InvalidPolicy)
        ));
        assert!(matches!(
            policy.replace(OrientationSet::EMPTY),
            Err(BridgeError::InvalidPolicy)
        ));
        assert_eq!(policy.current(), OrientationSet::LANDSCAPE);
    }

    #[test]
    fn replace_returns_previous() {
        let policy = OrientationPolicy::new(OrientationSet::PORTRAIT).unwrap();
        let prev = policy.replace(OrientationSet::ALL).unwrap();
        assert_eq!(prev, OrientationSet::PORTRAIT);
    }

    #[test]
    fn empty_initial_policy_rejected() {
        assert!(OrientationPolicy::new(OrientationSet::EMPTY).is_err());
    }
}

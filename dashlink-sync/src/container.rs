//! Panel container abstraction.
//!
//! A panel container renders the gadgets of one panel. The engine never
//! touches gadgets directly: it hands the container the units that changed
//! and then tells it which fingerprints the panel should show, in order.

use dashlink_types::{Config, Fingerprint};

/// A unit handed to a container because it changed.
#[derive(Debug, Clone, PartialEq)]
pub struct GadgetUnit {
    /// Position of the unit in its panel.
    pub index: usize,
    /// Fingerprint the unit was reconciled with.
    pub fingerprint: Fingerprint,
    /// The unit's configuration, without the fingerprint marker.
    pub config: Config,
}

impl GadgetUnit {
    /// Returns the configuration with the fingerprint marker stamped on it.
    pub fn stamped(&self) -> Config {
        self.config.with_fingerprint(&self.fingerprint)
    }
}

/// Renders the gadgets of one panel.
pub trait PanelContainer: Send + Sync {
    /// Adds or updates gadgets.
    ///
    /// `insertion_index` is only given when exactly one unit changed; with
    /// several units the container places them by its own policy.
    fn add(&self, units: Vec<GadgetUnit>, insertion_index: Option<usize>);

    /// Reconciles what is on screen with the authoritative fingerprint list:
    /// reorder, and drop gadgets that no longer appear in `expected`.
    fn verify(&self, expected: &[Fingerprint]);
}

/// A recording container for testing.
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    /// One recorded `add` call.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AddCall {
        pub units: Vec<GadgetUnit>,
        pub insertion_index: Option<usize>,
    }

    /// Records every call it receives and keeps a simple on-screen model.
    #[derive(Debug, Default)]
    pub struct RecordingContainer {
        adds: Mutex<Vec<AddCall>>,
        verifies: Mutex<Vec<Vec<Fingerprint>>>,
        shown: Mutex<Vec<Fingerprint>>,
    }

    impl RecordingContainer {
        pub fn new() -> Self {
            Self::default()
        }

        /// All `add` calls so far.
        pub fn adds(&self) -> Vec<AddCall> {
            lock(&self.adds).clone()
        }

        /// All `verify` calls so far.
        pub fn verifies(&self) -> Vec<Vec<Fingerprint>> {
            lock(&self.verifies).clone()
        }

        /// Fingerprints currently on screen, in order.
        pub fn shown(&self) -> Vec<Fingerprint> {
            lock(&self.shown).clone()
        }

        /// Forgets recorded calls, keeping the on-screen model.
        pub fn reset_calls(&self) {
            lock(&self.adds).clear();
            lock(&self.verifies).clear();
        }
    }

    impl PanelContainer for RecordingContainer {
        fn add(&self, units: Vec<GadgetUnit>, insertion_index: Option<usize>) {
            {
                let mut shown = lock(&self.shown);
                for unit in &units {
                    let at = unit.index.min(shown.len());
                    shown.insert(at, unit.fingerprint.clone());
                }
            }
            lock(&self.adds).push(AddCall {
                units,
                insertion_index,
            });
        }

        fn verify(&self, expected: &[Fingerprint]) {
            *lock(&self.shown) = expected.to_vec();
            lock(&self.verifies).push(expected.to_vec());
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! Layout state store.
//!
//! Holds the live layout next to the fingerprints it had when it was last
//! reconciled. Every mutation touches both mappings together, so for each
//! panel the unit list and the fingerprint list always have the same length
//! and index `i` in both refers to the same unit.

use crate::error::{SyncError, SyncResult};
use dashlink_types::{Config, Fingerprint, FingerprintTable, LayoutState, PanelName};
use serde_json::Value;
use std::collections::BTreeMap;

/// Previous per-panel fingerprints, as returned by [`StateStore::take_panels`].
pub type PanelFingerprints = BTreeMap<PanelName, Vec<Option<Fingerprint>>>;

/// The live layout and its fingerprint table.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    current: LayoutState,
    fingerprints: FingerprintTable,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live layout.
    pub fn current(&self) -> &LayoutState {
        &self.current
    }

    /// Returns the fingerprint table.
    pub fn fingerprints(&self) -> &FingerprintTable {
        &self.fingerprints
    }

    /// Returns an owned copy of the live layout.
    pub fn snapshot(&self) -> LayoutState {
        self.current.clone()
    }

    /// Returns the wire JSON of the live layout.
    pub fn to_content(&self) -> Value {
        self.current.to_value()
    }

    // ── Main slot ────────────────────────────────────────────────

    /// Returns the main view configuration.
    pub fn main(&self) -> Option<&Config> {
        self.current.main.as_ref()
    }

    /// Returns the fingerprint of the reconciled main view.
    pub fn main_fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprints.main.as_ref()
    }

    /// Records a reconciled main view.
    pub fn commit_main(&mut self, config: Config, fingerprint: Fingerprint) {
        self.current.main = Some(config);
        self.fingerprints.main = Some(fingerprint);
    }

    /// Sets a main view that has not been reconciled yet.
    ///
    /// The fingerprint is cleared, so the next reconciliation of this config
    /// rebuilds the primary view.
    pub fn stage_main(&mut self, config: Config) {
        self.current.main = Some(config);
        self.fingerprints.main = None;
    }

    /// Clears the main slot.
    pub fn clear_main(&mut self) {
        self.current.main = None;
        self.fingerprints.main = None;
    }

    // ── Panels ───────────────────────────────────────────────────

    /// Returns a panel's units.
    pub fn panel(&self, panel: PanelName) -> &[Config] {
        self.current.panel(panel)
    }

    /// Returns a panel's fingerprint slots.
    pub fn panel_fingerprints(&self, panel: PanelName) -> &[Option<Fingerprint>] {
        self.fingerprints.panel(panel)
    }

    /// Returns the number of units in a panel.
    pub fn panel_len(&self, panel: PanelName) -> usize {
        self.current.panel(panel).len()
    }

    /// Appends a unit that has not been reconciled yet.
    pub fn push(&mut self, panel: PanelName, config: Config) {
        self.current.panels.entry(panel).or_default().push(config);
        self.fingerprints.panels.entry(panel).or_default().push(None);
    }

    /// Replaces the unit at `index`, keeping its last-synced fingerprint.
    pub fn replace(&mut self, panel: PanelName, index: usize, config: Config) -> SyncResult<()> {
        let len = self.panel_len(panel);
        match self.current.panels.get_mut(&panel).and_then(|units| units.get_mut(index)) {
            Some(slot) => {
                *slot = config;
                Ok(())
            }
            None => Err(SyncError::SlotOutOfRange { panel, index, len }),
        }
    }

    /// Removes the unit at `index` from both mappings.
    ///
    /// The panel is deleted once it has no units left. Returns false if
    /// there was nothing at `index`.
    pub fn remove(&mut self, panel: PanelName, index: usize) -> bool {
        if index >= self.panel_len(panel) {
            return false;
        }

        if let Some(units) = self.current.panels.get_mut(&panel) {
            units.remove(index);
            if units.is_empty() {
                self.current.panels.remove(&panel);
            }
        }
        if let Some(slots) = self.fingerprints.panels.get_mut(&panel) {
            slots.remove(index);
            if slots.is_empty() {
                self.fingerprints.panels.remove(&panel);
            }
        }
        true
    }

    /// Records a reconciled panel. An empty list deletes the panel.
    pub fn commit_panel(&mut self, panel: PanelName, units: Vec<(Fingerprint, Config)>) {
        if units.is_empty() {
            self.current.panels.remove(&panel);
            self.fingerprints.panels.remove(&panel);
            return;
        }

        let (fingerprints, configs): (Vec<_>, Vec<_>) = units
            .into_iter()
            .map(|(fingerprint, config)| (Some(fingerprint), config))
            .unzip();
        self.current.panels.insert(panel, configs);
        self.fingerprints.panels.insert(panel, fingerprints);
    }

    /// Clears every panel from both mappings, returning the previous
    /// fingerprints.
    pub fn take_panels(&mut self) -> PanelFingerprints {
        self.current.panels.clear();
        std::mem::take(&mut self.fingerprints.panels)
    }

    /// Returns true if every panel's unit and fingerprint lists line up.
    pub fn is_aligned(&self) -> bool {
        PanelName::ALL.iter().all(|panel| {
            self.current.panels.contains_key(panel) == self.fingerprints.panels.contains_key(panel)
                && self.panel(*panel).len() == self.panel_fingerprints(*panel).len()
        })
    }
}

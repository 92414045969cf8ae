//! Layout state and its fingerprint table.

use crate::{Config, Error, Fingerprint, PanelName, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The whole visible layout: the main view plus the gadget panels.
///
/// On the wire the panels are flattened next to `main`:
///
/// ```json
/// {"main": {"type": "portfolio"}, "south": [{"type": "A"}], "dock-north": []}
/// ```
///
/// Panels with no units are omitted when serializing. `main` is always
/// written, as `null` when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    /// The primary view configuration.
    pub main: Option<Config>,
    /// Gadget lists per panel.
    pub panels: BTreeMap<PanelName, Vec<Config>>,
}

impl LayoutState {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the main view configuration.
    pub fn with_main(mut self, main: Config) -> Self {
        self.main = Some(main);
        self
    }

    /// Sets a panel's gadget list. An empty list removes the panel.
    pub fn with_panel(mut self, panel: PanelName, units: Vec<Config>) -> Self {
        if units.is_empty() {
            self.panels.remove(&panel);
        } else {
            self.panels.insert(panel, units);
        }
        self
    }

    /// Returns a panel's units, or an empty slice if the panel is absent.
    pub fn panel(&self, panel: PanelName) -> &[Config] {
        self.panels.get(&panel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if there is no main view and no panel has units.
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.panels.values().all(Vec::is_empty)
    }

    /// Decodes a layout from its wire JSON.
    ///
    /// `null` decodes to an empty layout. Unknown top-level keys are ignored.
    /// A known panel key must hold an array or `null`.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(Error::MalformedLayout(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )));
            }
        };

        let main = match map.remove("main") {
            None | Some(Value::Null) => None,
            Some(value) => Some(Config::new(value)),
        };

        let mut panels = BTreeMap::new();
        for panel in PanelName::ALL {
            match map.remove(panel.as_str()) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => {
                    if !items.is_empty() {
                        panels.insert(panel, items.into_iter().map(Config::new).collect());
                    }
                }
                Some(other) => {
                    return Err(Error::MalformedLayout(format!(
                        "panel {panel} must be a list, got {}",
                        json_kind(&other)
                    )));
                }
            }
        }

        Ok(Self { main, panels })
    }

    /// Encodes the layout as wire JSON.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "main".to_string(),
            self.main.as_ref().map_or(Value::Null, |c| c.as_value().clone()),
        );
        for (panel, units) in &self.panels {
            if units.is_empty() {
                continue;
            }
            map.insert(
                panel.as_str().to_string(),
                Value::Array(units.iter().map(|c| c.as_value().clone()).collect()),
            );
        }
        Value::Object(map)
    }
}

impl Serialize for LayoutState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let populated: Vec<_> = self.panels.iter().filter(|(_, u)| !u.is_empty()).collect();
        let mut map = serializer.serialize_map(Some(1 + populated.len()))?;
        map.serialize_entry("main", &self.main)?;
        for (panel, units) in populated {
            map.serialize_entry(panel.as_str(), units)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LayoutState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Last-synced fingerprints, shaped like [`LayoutState`].
///
/// `panels[p][i]` is the fingerprint unit `i` of panel `p` had when it was last
/// reconciled. A slot is `None` while its unit has been added locally but not
/// reconciled yet. Sequences always have the same length as the matching
/// sequences in the layout state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintTable {
    /// Fingerprint of the reconciled main view.
    pub main: Option<Fingerprint>,
    /// Per-panel slot fingerprints.
    pub panels: BTreeMap<PanelName, Vec<Option<Fingerprint>>>,
}

impl FingerprintTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a panel's slots, or an empty slice if the panel is absent.
    pub fn panel(&self, panel: PanelName) -> &[Option<Fingerprint>] {
        self.panels.get(&panel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the reconciled fingerprints of a panel, skipping pending slots.
    pub fn synced(&self, panel: PanelName) -> Vec<Fingerprint> {
        self.panel(panel).iter().flatten().cloned().collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

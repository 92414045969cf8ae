//! Panel names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named auxiliary panel holding an ordered list of gadgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelName {
    #[serde(rename = "south")]
    South,
    #[serde(rename = "dock-north")]
    DockNorth,
    #[serde(rename = "dock-center")]
    DockCenter,
    #[serde(rename = "dock-south")]
    DockSouth,
}

impl PanelName {
    /// All panels, in the order they are reconciled.
    ///
    /// The order decides container initialization order on screen.
    pub const ALL: [PanelName; 4] = [
        PanelName::South,
        PanelName::DockNorth,
        PanelName::DockCenter,
        PanelName::DockSouth,
    ];

    /// The key used for this panel in the serialized layout.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PanelName::South => "south",
            PanelName::DockNorth => "dock-north",
            PanelName::DockCenter => "dock-center",
            PanelName::DockSouth => "dock-south",
        }
    }
}

impl fmt::Display for PanelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelName::ALL
            .into_iter()
            .find(|panel| panel.as_str() == s)
            .ok_or_else(|| crate::Error::UnknownPanel(s.to_string()))
    }
}

//! Locators: the shareable address of a compressed layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token issued by the compression service for one stored payload.
///
/// Tokens cannot be decoded locally; they only round-trip through the
/// service that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorToken(String);

impl LocatorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocatorToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Arguments parsed out of the current locator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorArgs {
    /// Token of the compressed layout, if the locator carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LocatorToken>,
}

impl LocatorArgs {
    /// Arguments carrying a layout token.
    pub fn with_data(token: LocatorToken) -> Self {
        Self { data: Some(token) }
    }
}

/// The locator currently installed in routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// The full hash string.
    pub hash: String,
    /// The arguments parsed from it.
    pub args: LocatorArgs,
}

/// The routed view a layout locator loads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteView {
    /// The analytics dashboard.
    Analytics,
    /// The trade blotter, which adds editing affordances to the main grid.
    Blotter,
}

impl RouteView {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RouteView::Analytics => "analytics",
            RouteView::Blotter => "blotter",
        }
    }
}

impl fmt::Display for RouteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

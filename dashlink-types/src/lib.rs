//! Core type definitions for dashlink.
//!
//! This crate defines the plain data types shared by the layout engine and
//! its tooling:
//! - Opaque gadget configurations and their fingerprints
//! - The layout state (main view plus panel lists) and its fingerprint table
//! - Locators, locator tokens and route views
//! - Mount identifiers for primary views
//!
//! Gadget schemas belong to the gadgets themselves, not here. The engine only
//! ever sees [`Config`] values.

mod config;
mod fingerprint;
mod ids;
mod layout;
mod locator;
mod panel;

pub use config::{Config, FINGERPRINT_FIELD};
pub use fingerprint::Fingerprint;
pub use ids::MountId;
pub use layout::{FingerprintTable, LayoutState};
pub use locator::{Locator, LocatorArgs, LocatorToken, RouteView};
pub use panel::PanelName;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    #[error("unknown panel: {0}")]
    UnknownPanel(String),
}

//! Layout reconciliation engine for dashlink.
//!
//! A dashboard's whole layout (one main view plus the gadget panels) is kept
//! in a single locator. This crate keeps that locator and the live screen in
//! step, in both directions:
//!
//! - **Publish** (state → locator): a mutation changes the state store, the
//!   store is compressed into a token by a remote compressor, and a locator
//!   carrying the token is installed in routing.
//! - **Reconcile** (locator → state): routing hands a locator back, the token
//!   is resolved, and the decoded layout is diffed against the store unit by
//!   unit. Only units whose fingerprint changed are handed to their panel's
//!   container.
//!
//! ## Components
//!
//! - **Codec**: canonical fingerprints of configs
//! - **Compressor**: token ↔ payload service (HTTP or in-memory)
//! - **Store**: live layout plus last-synced fingerprints, kept aligned
//! - **Engine**: reconciliation, mutations and publishing
//! - **Collaborators**: routing, containers, views, forms, menus
//!
//! # Example
//!
//! ```
//! use dashlink_sync::codec::{clone_from_fingerprint, fingerprint_of};
//! use dashlink_types::Config;
//! use serde_json::json;
//!
//! let config = Config::new(json!({"type": "positions", "id": 7, "fingerprint": "stale"}));
//! let fingerprint = fingerprint_of(&config).unwrap();
//! assert_eq!(fingerprint.as_str(), r#"{"id":7,"type":"positions"}"#);
//!
//! let copy = clone_from_fingerprint(&fingerprint).unwrap();
//! assert_eq!(fingerprint_of(&copy).unwrap(), fingerprint);
//! ```

pub mod codec;
pub mod compressor;
pub mod container;
pub mod context_menu;
mod engine;
mod error;
mod mutation;
pub mod routing;
pub mod store;
pub mod view;

pub use compressor::{CompressorConfig, HttpCompressor, MemoryCompressor, StateCompressor};
pub use container::{GadgetUnit, PanelContainer};
pub use context_menu::{
    context_items, CellType, ContextMenu, GridCell, MenuAction, MenuItem, RowValue, TradeDialogs,
};
pub use engine::{Collaborators, EngineConfig, LayoutEngine, ReconcileReport};
pub use error::{SyncError, SyncResult};
pub use mutation::PublishOutcome;
pub use routing::{Launcher, Router};
pub use store::StateStore;
pub use view::{MainForm, PrimaryView, PrimaryViewHost, ViewEvent, ViewListener, ViewOptions};

//! Error types for the layout engine.

use dashlink_types::PanelName;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while reconciling or publishing layouts.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network error talking to the compressor service.
    #[error("network error: {0}")]
    Network(String),

    /// The compressor service answered with an error status.
    #[error("compressor error ({status}): {message}")]
    Compressor { status: u16, message: String },

    /// The compressor service does not know the token.
    #[error("token not found: {0}")]
    TokenNotFound(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The decoded layout payload is malformed.
    #[error("layout error: {0}")]
    Layout(#[from] dashlink_types::Error),

    /// A slot index outside the panel.
    #[error("slot {index} out of range for panel {panel} (len {len})")]
    SlotOutOfRange {
        panel: PanelName,
        index: usize,
        len: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

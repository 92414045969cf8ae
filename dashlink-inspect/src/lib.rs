//! Helpers behind the `dashlink-inspect` binary.

use anyhow::{Context, Result};
use dashlink_sync::codec::fingerprint_of;
use dashlink_sync::StateCompressor;
use dashlink_types::{Config, LayoutState, LocatorToken, PanelName};
use serde::Serialize;
use serde_json::Value;

/// One fingerprinted slot of a layout.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FingerprintRow {
    /// `main`, or `panel[index]`.
    pub slot: String,
    /// Short digest of the fingerprint.
    pub short: String,
    /// Full canonical fingerprint.
    pub fingerprint: String,
}

/// Resolves a token and decodes it as a layout.
pub async fn decode_layout(
    compressor: &dyn StateCompressor,
    token: &LocatorToken,
    dependencies: &[String],
) -> Result<LayoutState> {
    let content = compressor
        .fetch(token, dependencies)
        .await
        .with_context(|| format!("Failed to resolve token {token}"))?;
    LayoutState::from_value(content).context("Token does not hold a layout")
}

/// Validates layout JSON and stores it, returning the token.
pub async fn encode_layout(
    compressor: &dyn StateCompressor,
    content: Value,
    dependencies: &[String],
) -> Result<LocatorToken> {
    let layout = LayoutState::from_value(content).context("Input is not a layout")?;
    compressor
        .store(&layout.to_value(), dependencies)
        .await
        .context("Failed to store layout")
}

/// Fingerprints every unit of a layout, main first, then panels in order.
pub fn fingerprint_rows(layout: &LayoutState) -> Result<Vec<FingerprintRow>> {
    let mut rows = Vec::new();
    if let Some(main) = &layout.main {
        rows.push(row("main".to_string(), main)?);
    }
    for panel in PanelName::ALL {
        for (index, unit) in layout.panel(panel).iter().enumerate() {
            rows.push(row(format!("{panel}[{index}]"), unit)?);
        }
    }
    Ok(rows)
}

fn row(slot: String, config: &Config) -> Result<FingerprintRow> {
    let fingerprint =
        fingerprint_of(config).with_context(|| format!("Failed to fingerprint {slot}"))?;
    Ok(FingerprintRow {
        slot,
        short: fingerprint.short(),
        fingerprint: fingerprint.into_string(),
    })
}

/// Formats rows as aligned text, one slot per line.
pub fn render_rows(rows: &[FingerprintRow]) -> String {
    let width = rows.iter().map(|r| r.slot.len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| format!("{:width$}  {}  {}\n", r.slot, r.short, r.fingerprint))
        .collect()
}

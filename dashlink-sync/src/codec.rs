//! Fingerprint codec.
//!
//! A fingerprint is the canonical JSON text of a config: object keys sorted
//! at every depth, no insignificant whitespace, and the top-level fingerprint
//! marker removed. Equal logical content always yields the same text, and
//! the text parses back into an independent copy of the config.

use crate::error::SyncResult;
use dashlink_types::{Config, Fingerprint};
use serde_json::{Map, Value};

/// Computes the fingerprint of a config.
pub fn fingerprint_of(config: &Config) -> SyncResult<Fingerprint> {
    let stripped = config.without_fingerprint();
    let canonical = canonicalize(stripped.as_value());
    Ok(Fingerprint::new(serde_json::to_string(&canonical)?))
}

/// Rebuilds an owned config from its fingerprint.
pub fn clone_from_fingerprint(fingerprint: &Fingerprint) -> SyncResult<Config> {
    let value: Value = serde_json::from_str(fingerprint.as_str())?;
    Ok(Config::new(value))
}

/// Fingerprints a config and parses the result back in one step.
///
/// Returns the fingerprint together with the detached copy the state store
/// keeps, so later changes to the caller's value never leak into it.
pub fn detach(config: &Config) -> SyncResult<(Fingerprint, Config)> {
    let fingerprint = fingerprint_of(config)?;
    let copy = clone_from_fingerprint(&fingerprint)?;
    Ok((fingerprint, copy))
}

// Keys are sorted here rather than relying on serde_json's map type, which
// keeps insertion order when `preserve_order` is enabled.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

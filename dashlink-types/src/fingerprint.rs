//! Fingerprints: canonical content keys of configurations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Canonical serialized form of a [`crate::Config`].
///
/// Two configs with equal fingerprints are treated as the same unit when
/// diffing. The fingerprint is the full canonical text, not a digest, so a
/// config can be rebuilt from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wraps canonical text produced by the fingerprint codec.
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    /// Returns the canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fingerprint, returning the canonical text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Short hex digest for log lines.
    pub fn short(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

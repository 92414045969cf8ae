//! Opaque gadget configuration values.

use crate::fingerprint::Fingerprint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the marker field the engine stamps onto changed units.
///
/// The marker is never part of a unit's identity: it is stripped before a
/// unit is fingerprinted.
pub const FINGERPRINT_FIELD: &str = "fingerprint";

/// A gadget or main-view configuration.
///
/// The schema is owned by whoever renders the configuration. The engine only
/// compares, copies and stores these values, so they stay plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Value);

impl Config {
    /// Wraps an arbitrary JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty object.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Converts a collaborator-owned typed configuration.
    pub fn from_typed<T: Serialize>(typed: &T) -> crate::Result<Self> {
        Ok(Self(serde_json::to_value(typed)?))
    }

    /// Converts back into a collaborator-owned typed configuration.
    pub fn to_typed<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_value(self.0.clone())?)
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the config, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns a top-level field, if the config is an object that has it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    /// Returns the `type` field as a string, if there is one.
    pub fn kind(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    /// Returns a shallow copy without the fingerprint marker.
    pub fn without_fingerprint(&self) -> Self {
        match &self.0 {
            Value::Object(map) if map.contains_key(FINGERPRINT_FIELD) => {
                let mut map = map.clone();
                map.remove(FINGERPRINT_FIELD);
                Self(Value::Object(map))
            }
            other => Self(other.clone()),
        }
    }

    /// Returns a copy stamped with the given fingerprint.
    ///
    /// Non-object configs cannot carry the marker and are returned unchanged.
    pub fn with_fingerprint(&self, fingerprint: &Fingerprint) -> Self {
        self.with_field(FINGERPRINT_FIELD, Value::String(fingerprint.as_str().to_string()))
    }

    /// Returns a copy with one top-level field set.
    pub fn with_field(&self, key: &str, value: Value) -> Self {
        match &self.0 {
            Value::Object(map) => {
                let mut map = map.clone();
                map.insert(key.to_string(), value);
                Self(Value::Object(map))
            }
            other => Self(other.clone()),
        }
    }

    /// Shallow merge: fields of `overlay` replace fields of `self`.
    ///
    /// If either side is not an object the overlay wins outright.
    pub fn merged(&self, overlay: &Config) -> Self {
        match (&self.0, &overlay.0) {
            (Value::Object(base), Value::Object(top)) => {
                let mut map = base.clone();
                for (key, value) in top {
                    map.insert(key.clone(), value.clone());
                }
                Self(Value::Object(map))
            }
            _ => overlay.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Self {
        config.0
    }
}

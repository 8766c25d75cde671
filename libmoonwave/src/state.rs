//! Application state
//!
//! State is a flat mapping from key to JSON value. Updates are merged at the
//! top level only: a patch replaces whole keys and never reaches into nested
//! objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MoonwaveError, Result};
use crate::router::Route;

/// Key under which the current route is kept
pub const ROUTE_KEY: &str = "route";

/// Snapshot of application state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Map<String, Value>);

impl State {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(MoonwaveError::InvalidState(format!(
                "state must be an object, got {}",
                other
            ))),
        }
    }

    /// Build a single-key state, e.g. `{route: ...}`
    pub fn with(key: impl Into<String>, value: Value) -> Self {
        let mut map = Map::new();
        map.insert(key.into(), value);
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow merge: every key in `patch` replaces the key in `self`
    pub fn merge(&mut self, patch: State) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// The route last pushed by the router, if any
    pub fn route(&self) -> Option<Route> {
        self.0
            .get(ROUTE_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for State {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for State {
    type Error = MoonwaveError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for State {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

//! Actions and the action-handler registry
//!
//! All state transitions are triggered by actions. An action is an immutable
//! value with a kind and a payload. The kind `"navigate"` is reserved: it is
//! parsed into [`Action::Navigate`] and routed to the router instead of user
//! code.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{MoonwaveError, Result};
use crate::store::Store;

/// Reserved action kind handled by the router
pub const NAVIGATE: &str = "navigate";

/// Handler registered for one action kind: `(store, payload)`
pub type ActionHandler = Rc<dyn Fn(&dyn Store, Value) -> Result<()>>;

/// Actions that flow through the evolution function
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Reserved kind: push a path onto the router
    Navigate(Navigation),

    /// Any application-defined kind
    Custom { kind: String, payload: Value },
}

/// Payload of a navigate action
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub path: String,

    /// Remaining payload fields, handed to the router as transition data
    pub extra: Option<Map<String, Value>>,
}

impl Navigation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extra: None,
        }
    }

    /// Parse `{path, ...extra}`
    pub fn from_payload(payload: Value) -> Result<Self> {
        let mut fields = match payload {
            Value::Object(fields) => fields,
            other => {
                return Err(MoonwaveError::InvalidAction(format!(
                    "navigate payload must be an object with a path, got {}",
                    other
                )))
            }
        };

        let path = match fields.remove("path") {
            Some(Value::String(path)) => path,
            _ => {
                return Err(MoonwaveError::InvalidAction(
                    "navigate payload is missing a string 'path'".to_string(),
                ))
            }
        };

        let extra = if fields.is_empty() { None } else { Some(fields) };

        Ok(Self { path, extra })
    }

    fn into_payload(self) -> Value {
        let mut fields = self.extra.unwrap_or_default();
        fields.insert("path".to_string(), Value::String(self.path));
        Value::Object(fields)
    }
}

impl Action {
    /// Build an action from a kind and payload, recognising the reserved kind
    pub fn new(kind: impl Into<String>, payload: Value) -> Result<Self> {
        let kind = kind.into();
        if kind == NAVIGATE {
            Ok(Action::Navigate(Navigation::from_payload(payload)?))
        } else {
            Ok(Action::Custom { kind, payload })
        }
    }

    pub fn navigate(path: impl Into<String>) -> Self {
        Action::Navigate(Navigation::new(path))
    }

    pub fn kind(&self) -> &str {
        match self {
            Action::Navigate(_) => NAVIGATE,
            Action::Custom { kind, .. } => kind,
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.kind() == NAVIGATE
    }

    pub fn payload(&self) -> Value {
        match self {
            Action::Navigate(navigation) => navigation.clone().into_payload(),
            Action::Custom { payload, .. } => payload.clone(),
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Action::Navigate(navigation) => navigation.into_payload(),
            Action::Custom { payload, .. } => payload,
        }
    }
}

/// Explicit registration map from action kind to handler
///
/// Lookup happens when an action is dispatched, so a kind with no handler only
/// fails once something actually dispatches it.
#[derive(Clone, Default)]
pub struct Actions {
    handlers: HashMap<String, ActionHandler>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, chainable
    pub fn on<F>(mut self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&dyn Store, Value) -> Result<()> + 'static,
    {
        self.insert(kind, handler);
        self
    }

    pub fn insert<F>(&mut self, kind: impl Into<String>, handler: F)
    where
        F: Fn(&dyn Store, Value) -> Result<()> + 'static,
    {
        self.handlers.insert(kind.into(), Rc::new(handler));
    }

    pub fn get(&self, kind: &str) -> Option<&ActionHandler> {
        self.handlers.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler registered for the action's kind
    pub fn dispatch(&self, store: &dyn Store, action: Action) -> Result<()> {
        let kind = action.kind().to_string();
        match self.handlers.get(&kind) {
            Some(handler) => handler(store, action.into_payload()),
            None => Err(MoonwaveError::UnhandledAction(kind)),
        }
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_parses_reserved_kind() {
        let action = Action::new("navigate", json!({"path": "/about"})).unwrap();
        assert_eq!(action, Action::Navigate(Navigation::new("/about")));
        assert!(action.is_navigation());
    }

    #[test]
    fn test_navigate_keeps_extra_fields() {
        let action = Action::new("navigate", json!({"path": "/p", "replace": true})).unwrap();
        match action {
            Action::Navigate(navigation) => {
                assert_eq!(navigation.path, "/p");
                assert_eq!(navigation.extra.map(Value::Object), Some(json!({"replace": true})));
            }
            _ => panic!("Expected navigate action"),
        }
    }

    #[test]
    fn test_navigate_requires_path() {
        let err = Action::new("navigate", json!({"to": "/about"})).unwrap_err();
        assert!(matches!(err, MoonwaveError::InvalidAction(_)));

        let err = Action::new("navigate", json!("/about")).unwrap_err();
        assert!(matches!(err, MoonwaveError::InvalidAction(_)));
    }

    #[test]
    fn test_custom_action() {
        let action = Action::new("increment", json!(1)).unwrap();
        assert_eq!(action.kind(), "increment");
        assert_eq!(action.payload(), json!(1));
        assert!(!action.is_navigation());
    }

    #[test]
    fn test_navigation_payload_roundtrip() {
        let payload = json!({"path": "/a", "replace": true});
        let action = Action::new("navigate", payload.clone()).unwrap();
        assert_eq!(action.into_payload(), payload);
    }

    #[test]
    fn test_navigation_with_extra_survives_reparse() {
        let mut extra = Map::new();
        extra.insert("replace".to_string(), json!(true));
        let navigation = Navigation {
            path: "/a".to_string(),
            extra: Some(extra),
        };

        let original = Action::Navigate(navigation);
        let reparsed = Action::new(NAVIGATE, original.payload()).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_actions_registry() {
        let actions = Actions::new()
            .on("b", |_, _| Ok(()))
            .on("a", |_, _| Ok(()));

        assert_eq!(actions.len(), 2);
        assert!(actions.contains("a"));
        assert!(!actions.contains("c"));
        assert_eq!(actions.kinds(), vec!["a", "b"]);
    }
}

//! Router abstraction
//!
//! A router resolves paths to [`Route`]s, emits a transition every time the
//! current route changes and answers which view descriptors belong to a
//! matched pattern.
//!
//! # Examples
//!
//! ```
//! use libmoonwave::router::{RouteDef, flatten_routes};
//!
//! let routes = vec![
//!     RouteDef::new("/", "layout").child(RouteDef::new("/about", "about")),
//! ];
//!
//! let table = flatten_routes(&routes);
//! // Children come before their parent so the more specific pattern wins
//! assert_eq!(table[0].0, "/about");
//! assert_eq!(table[0].1.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::store::Store;

pub mod memory;

// Mock router is available for all builds (not just tests) to support integration tests
pub mod mock;

pub use memory::MemoryRouter;
pub use mock::MockRouter;

/// Transition listener registered with a started router
pub type TransitionFn = Rc<dyn Fn(Route) -> Result<()>>;

/// Application-level transition callback: `(store, route)`
pub type OnTransition = Rc<dyn Fn(&dyn Store, Route) -> Result<()>>;

/// Builds a router from its configuration
pub type RouterFactory = Rc<dyn Fn(&RouterConfig) -> Result<Rc<dyn Router>>>;

/// Router interface consumed by the application lifecycle
pub trait Router {
    /// Resolve the initial route and register for future transitions
    fn start(&self, on_transition: TransitionFn) -> Result<()>;

    /// Release the transition listener
    fn stop(&self);

    /// Navigate to `path`; the transition is delivered to the listener
    fn push(&self, path: &str, extra: Option<Value>) -> Result<()>;

    /// View descriptors for a matched pattern, outermost first
    fn data(&self, pattern: &str) -> Vec<ViewDescriptor>;
}

/// Opaque unit a renderer knows how to draw
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewDescriptor(String);

impl ViewDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewDescriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ViewDescriptor {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of resolving a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Pattern that matched, used to look up views
    pub pattern: String,

    /// Concrete path that was resolved
    pub path: String,

    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Transition data handed to `push`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl Route {
    pub fn new(pattern: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            path: path.into(),
            params: BTreeMap::new(),
            extra: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_extra(mut self, extra: Option<Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// One entry of the route list, optionally with nested children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDef {
    pub pattern: String,
    pub view: ViewDescriptor,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    pub fn new(pattern: impl Into<String>, view: impl Into<ViewDescriptor>) -> Self {
        Self {
            pattern: pattern.into(),
            view: view.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: RouteDef) -> Self {
        self.children.push(child);
        self
    }
}

/// Router construction parameters
#[derive(Clone, Default)]
pub struct RouterConfig {
    pub routes: Vec<RouteDef>,

    /// Replaces the default `{route}` state update when set
    pub on_transition: Option<OnTransition>,

    /// Path resolved by `start`, `/` when unset
    pub initial_path: Option<String>,
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("routes", &self.routes)
            .field("on_transition", &self.on_transition.is_some())
            .field("initial_path", &self.initial_path)
            .finish()
    }
}

/// Flatten nested route definitions into `(pattern, views)` pairs
///
/// Each entry carries the views of its ancestors followed by its own view.
/// Children are listed before their parent, siblings keep declaration order.
pub fn flatten_routes(routes: &[RouteDef]) -> Vec<(String, Vec<ViewDescriptor>)> {
    let mut table = Vec::new();
    for route in routes {
        flatten_into(route, &[], &mut table);
    }
    table
}

fn flatten_into(
    route: &RouteDef,
    ancestors: &[ViewDescriptor],
    table: &mut Vec<(String, Vec<ViewDescriptor>)>,
) {
    let mut views = ancestors.to_vec();
    views.push(route.view.clone());

    for child in &route.children {
        flatten_into(child, &views, table);
    }

    table.push((route.pattern.clone(), views));
}

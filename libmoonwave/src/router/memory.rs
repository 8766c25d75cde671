//! In-process router with its own history
//!
//! Patterns are made of literal segments, `:name` parameters and an optional
//! trailing `*` that swallows the rest of the path. A lone `*` matches
//! everything.
//!
//! `start` resolves the initial path synchronously. `push` resolves the new
//! path immediately but delivers the transition on a local task, so listeners
//! always observe it after the dispatch that caused it has returned. Must be
//! used inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, warn};

use super::{flatten_routes, Route, Router, RouterConfig, RouterFactory, TransitionFn, ViewDescriptor};
use crate::error::{MoonwaveError, Result};

const DEFAULT_PATH: &str = "/";

#[derive(Clone)]
pub struct MemoryRouter {
    inner: Rc<MemoryInner>,
}

struct MemoryInner {
    table: Vec<(String, Vec<ViewDescriptor>)>,
    initial_path: String,
    history: RefCell<Vec<String>>,
    current: RefCell<Option<Route>>,
    listener: RefCell<Option<TransitionFn>>,
}

impl MemoryRouter {
    /// Build a router over `config.routes`
    ///
    /// Fails with a routing error if a pattern neither starts with `/` nor is
    /// a lone `*`, since such a pattern could never match a path.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let table = flatten_routes(&config.routes);
        if let Some((pattern, _)) = table
            .iter()
            .find(|(pattern, _)| pattern != "*" && !pattern.starts_with('/'))
        {
            return Err(MoonwaveError::Routing(format!(
                "invalid route pattern '{}': patterns start with '/' or are '*'",
                pattern
            )));
        }

        Ok(Self {
            inner: Rc::new(MemoryInner {
                table,
                initial_path: config
                    .initial_path
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PATH.to_string()),
                history: RefCell::new(Vec::new()),
                current: RefCell::new(None),
                listener: RefCell::new(None),
            }),
        })
    }

    /// Factory producing [`MemoryRouter`]s
    pub fn factory() -> RouterFactory {
        Rc::new(|config: &RouterConfig| Ok(Rc::new(MemoryRouter::new(config)?) as Rc<dyn Router>))
    }

    /// Resolve `path` against the route table without navigating
    pub fn resolve(&self, path: &str, extra: Option<Value>) -> Result<Route> {
        let path_only = path.split(['?', '#']).next().unwrap_or(path);

        self.inner
            .table
            .iter()
            .find_map(|(pattern, _)| {
                match_pattern(pattern, path_only).map(|params| Route {
                    pattern: pattern.clone(),
                    path: path.to_string(),
                    params,
                    extra: extra.clone(),
                })
            })
            .ok_or_else(|| MoonwaveError::Routing(format!("no route matches '{}'", path)))
    }

    /// Most recently delivered route
    pub fn current(&self) -> Option<Route> {
        self.inner.current.borrow().clone()
    }

    /// Paths delivered so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.inner.history.borrow().clone()
    }

    pub fn is_started(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }
}

impl MemoryInner {
    fn deliver(&self, route: Route) -> Result<()> {
        let listener = match self.listener.borrow().clone() {
            Some(listener) => listener,
            None => {
                debug!(path = %route.path, "Router stopped, dropping transition");
                return Ok(());
            }
        };

        self.history.borrow_mut().push(route.path.clone());
        *self.current.borrow_mut() = Some(route.clone());

        debug!(pattern = %route.pattern, path = %route.path, "Route transition");
        listener(route)
    }
}

impl Router for MemoryRouter {
    fn start(&self, on_transition: TransitionFn) -> Result<()> {
        if self.is_started() {
            return Err(MoonwaveError::Routing("router already started".to_string()));
        }

        let route = self.resolve(&self.inner.initial_path, None)?;
        *self.inner.listener.borrow_mut() = Some(on_transition);
        self.inner.deliver(route)
    }

    fn stop(&self) {
        self.inner.listener.borrow_mut().take();
    }

    fn push(&self, path: &str, extra: Option<Value>) -> Result<()> {
        if !self.is_started() {
            return Err(MoonwaveError::Routing("router is not started".to_string()));
        }

        let route = self.resolve(path, extra)?;
        let weak: Weak<MemoryInner> = Rc::downgrade(&self.inner);

        tokio::task::spawn_local(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = inner.deliver(route) {
                warn!("Transition listener failed: {}", e);
            }
        });

        Ok(())
    }

    fn data(&self, pattern: &str) -> Vec<ViewDescriptor> {
        self.inner
            .table
            .iter()
            .find(|(candidate, _)| candidate == pattern)
            .map(|(_, views)| views.clone())
            .unwrap_or_default()
    }
}

/// Match `path` against `pattern`, returning captured parameters
fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    if pattern == "*" {
        return Some(params);
    }

    let mut path_segments = segments(path);
    for segment in segments(pattern) {
        if segment == "*" {
            return Some(params);
        }

        let value = path_segments.next()?;
        if let Some(name) = segment.strip_prefix(':') {
            params.insert(name.to_string(), value.to_string());
        } else if segment != value {
            return None;
        }
    }

    match path_segments.next() {
        Some(_) => None,
        None => Some(params),
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

//! Mock router implementation for testing
//!
//! Records every interaction so tests can verify how the application
//! lifecycle drives its router: how many routers were built, start/stop
//! calls, and every path pushed. Transitions are only delivered when the
//! test asks for them with [`MockRouter::emit`] (or through the optional
//! initial route on `start`).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::{flatten_routes, Route, Router, RouterConfig, RouterFactory, TransitionFn, ViewDescriptor};
use crate::error::{MoonwaveError, Result};

/// Mock router; clones share the same recorded interactions
#[derive(Clone, Default)]
pub struct MockRouter {
    inner: Rc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    views: RefCell<HashMap<String, Vec<ViewDescriptor>>>,
    initial_route: RefCell<Option<Route>>,
    start_error: RefCell<Option<String>>,
    listener: RefCell<Option<TransitionFn>>,
    created: Cell<usize>,
    starts: Cell<usize>,
    stops: Cell<usize>,
    pushes: RefCell<Vec<(String, Option<Value>)>>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `route` synchronously when started
    pub fn with_initial_route(self, route: Route) -> Self {
        *self.inner.initial_route.borrow_mut() = Some(route);
        self
    }

    /// Make `start` fail with a routing error
    pub fn failing_start(self, error: &str) -> Self {
        *self.inner.start_error.borrow_mut() = Some(error.to_string());
        self
    }

    /// Factory that hands out this router and counts constructions
    pub fn factory(&self) -> RouterFactory {
        let router = self.clone();
        Rc::new(move |config: &RouterConfig| {
            router.inner.created.set(router.inner.created.get() + 1);
            *router.inner.views.borrow_mut() = flatten_routes(&config.routes).into_iter().collect();
            Ok(Rc::new(router.clone()) as Rc<dyn Router>)
        })
    }

    /// Deliver a transition to the registered listener
    pub fn emit(&self, route: Route) -> Result<()> {
        let listener = self.inner.listener.borrow().clone();
        match listener {
            Some(listener) => listener(route),
            None => Err(MoonwaveError::Routing("router is not started".to_string())),
        }
    }

    pub fn created(&self) -> usize {
        self.inner.created.get()
    }

    pub fn starts(&self) -> usize {
        self.inner.starts.get()
    }

    pub fn stops(&self) -> usize {
        self.inner.stops.get()
    }

    pub fn pushes(&self) -> Vec<(String, Option<Value>)> {
        self.inner.pushes.borrow().clone()
    }

    pub fn is_started(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }
}

impl Router for MockRouter {
    fn start(&self, on_transition: TransitionFn) -> Result<()> {
        self.inner.starts.set(self.inner.starts.get() + 1);

        if let Some(error) = self.inner.start_error.borrow().clone() {
            return Err(MoonwaveError::Routing(error));
        }

        *self.inner.listener.borrow_mut() = Some(on_transition);

        let initial = self.inner.initial_route.borrow().clone();
        match initial {
            Some(route) => self.emit(route),
            None => Ok(()),
        }
    }

    fn stop(&self) {
        self.inner.stops.set(self.inner.stops.get() + 1);
        self.inner.listener.borrow_mut().take();
    }

    fn push(&self, path: &str, extra: Option<Value>) -> Result<()> {
        self.inner.pushes.borrow_mut().push((path.to_string(), extra));
        Ok(())
    }

    fn data(&self, pattern: &str) -> Vec<ViewDescriptor> {
        self.inner.views.borrow().get(pattern).cloned().unwrap_or_default()
    }
}

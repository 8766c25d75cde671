//! Application builder and lifecycle
//!
//! [`Moonwave`] stages configuration through chainable setters. `mount`
//! consumes it, wires the state container, router and renderer together and
//! returns a live [`App`]. `App::unmount` tears the wiring down again and
//! hands back a builder holding the same configuration.
//!
//! # Example
//!
//! ```no_run
//! use libmoonwave::{Actions, Moonwave, RouteDef, State, Store};
//! use serde_json::json;
//!
//! # async fn example() -> libmoonwave::Result<()> {
//! let local = tokio::task::LocalSet::new();
//! local
//!     .run_until(async {
//!         let app = Moonwave::new()
//!             .state(State::from_value(json!({"count": 0}))?)
//!             .routes(vec![RouteDef::new("/", "counter")])
//!             .actions(Actions::new().on("increment", |store: &dyn Store, by| {
//!                 let count = store.get().get("count").and_then(|v| v.as_i64()).unwrap_or(0);
//!                 let by = by.as_i64().unwrap_or(1);
//!                 store.update(State::with("count", json!(count + by)))
//!             }))
//!             .render(|_app| |state: State| {
//!                 println!("{:?}", state);
//!                 Ok(())
//!             })
//!             .unrender(|_app| Ok(()))
//!             .mount("stdout")?;
//!
//!         app.split("increment", json!(2))?;
//!         app.unmount()?;
//!         Ok(())
//!     })
//!     .await
//! # }
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, error, info, trace};
use uuid::Uuid;

use crate::action::{Action, Actions};
use crate::error::{ConfigurationError, MoonwaveError, Result};
use crate::evolve::{default_evolve, with_routing, EvolveFn};
use crate::router::{
    MemoryRouter, OnTransition, Route, RouteDef, Router, RouterConfig, RouterFactory,
    TransitionFn, ViewDescriptor,
};
use crate::schedule::{Debounce, FRAME_INTERVAL};
use crate::settings::Settings;
use crate::state::{State, ROUTE_KEY};
use crate::store::{Atom, ChangeFn, Store, StoreConfig, StoreFactory};
use crate::validate::validate;

/// Draws one state snapshot
pub type RenderFn = Box<dyn Fn(State) -> Result<()>>;

/// Builds the render function for a mounted application
pub type RenderFactory<T> = Rc<dyn Fn(&App<T>) -> RenderFn>;

/// Tears down whatever the render function produced
pub type UnrenderFn<T> = Rc<dyn Fn(&App<T>) -> Result<()>>;

/// State container part of the configuration
#[derive(Clone, Default)]
pub struct StoreOptions {
    pub initial: State,
    pub evolve: Option<EvolveFn>,
    pub actions: Option<Actions>,

    /// Passed through to the store factory untouched
    pub extra: Map<String, Value>,
}

/// Everything accumulated by the builder, captured at mount time
pub struct Options<T> {
    pub store: StoreOptions,
    pub router: RouterConfig,
    pub render: Option<RenderFactory<T>>,
    pub unrender: Option<UnrenderFn<T>>,
    pub frame_interval: Duration,
    pub store_factory: StoreFactory,
    pub router_factory: RouterFactory,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            store: StoreOptions::default(),
            router: RouterConfig::default(),
            render: None,
            unrender: None,
            frame_interval: FRAME_INTERVAL,
            store_factory: Atom::factory(),
            router_factory: MemoryRouter::factory(),
        }
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            router: self.router.clone(),
            render: self.render.clone(),
            unrender: self.unrender.clone(),
            frame_interval: self.frame_interval,
            store_factory: Rc::clone(&self.store_factory),
            router_factory: Rc::clone(&self.router_factory),
        }
    }
}

impl<T> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("initial_state", &self.store.initial)
            .field("actions", &self.store.actions)
            .field("router", &self.router)
            .field("render", &self.render.is_some())
            .field("unrender", &self.unrender.is_some())
            .field("frame_interval", &self.frame_interval)
            .finish()
    }
}

/// Staging builder; `T` is the mount target handed to `mount`
pub struct Moonwave<T> {
    options: Options<T>,
}

impl<T> Default for Moonwave<T> {
    fn default() -> Self {
        Self {
            options: Options::default(),
        }
    }
}

impl<T> Moonwave<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: Options<T>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options<T> {
        &self.options
    }

    pub fn state(mut self, initial: State) -> Self {
        self.options.store.initial = initial;
        self
    }

    pub fn routes(mut self, routes: Vec<RouteDef>) -> Self {
        self.options.router.routes = routes;
        self
    }

    /// Set routes together with a transition callback
    pub fn routes_with_transition<F>(self, routes: Vec<RouteDef>, on_transition: F) -> Self
    where
        F: Fn(&dyn Store, Route) -> Result<()> + 'static,
    {
        self.routes(routes).on_transition(on_transition)
    }

    /// Replace the default `{route}` state update on every transition
    pub fn on_transition<F>(mut self, on_transition: F) -> Self
    where
        F: Fn(&dyn Store, Route) -> Result<()> + 'static,
    {
        self.options.router.on_transition = Some(Rc::new(on_transition));
        self
    }

    pub fn initial_path(mut self, path: impl Into<String>) -> Self {
        self.options.router.initial_path = Some(path.into());
        self
    }

    pub fn evolve<F>(mut self, evolve: F) -> Self
    where
        F: Fn(&dyn Store, Action, &Actions) -> Result<()> + 'static,
    {
        self.options.store.evolve = Some(Rc::new(evolve));
        self
    }

    pub fn actions(mut self, actions: Actions) -> Self {
        self.options.store.actions = Some(actions);
        self
    }

    pub fn store_extra(mut self, extra: Map<String, Value>) -> Self {
        self.options.store.extra = extra;
        self
    }

    pub fn render<F, R>(mut self, factory: F) -> Self
    where
        F: Fn(&App<T>) -> R + 'static,
        R: Fn(State) -> Result<()> + 'static,
    {
        self.options.render = Some(Rc::new(move |app: &App<T>| Box::new(factory(app)) as RenderFn));
        self
    }

    pub fn unrender<F>(mut self, unrender: F) -> Self
    where
        F: Fn(&App<T>) -> Result<()> + 'static,
    {
        self.options.unrender = Some(Rc::new(unrender));
        self
    }

    /// Debounce window for renders
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.options.frame_interval = interval;
        self
    }

    pub fn store_factory(mut self, factory: StoreFactory) -> Self {
        self.options.store_factory = factory;
        self
    }

    pub fn router_factory(mut self, factory: RouterFactory) -> Self {
        self.options.router_factory = factory;
        self
    }

    /// Apply routes, initial path, initial state and frame interval from settings
    ///
    /// Settings state is merged over state already staged; routes only
    /// replace staged routes when the settings declare some.
    pub fn with_settings(mut self, settings: &Settings) -> Result<Self> {
        self.options.frame_interval = settings.frame_interval()?;

        if let Some(path) = &settings.app.initial_path {
            self.options.router.initial_path = Some(path.clone());
        }
        if !settings.routes.is_empty() {
            self.options.router.routes = settings.routes.clone();
        }
        self.options.store.initial.merge(settings.state.clone());

        Ok(self)
    }
}

impl<T: Clone + 'static> Moonwave<T> {
    /// Activate the application on `root`
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet` once anything
    /// schedules a render or a router transition. Validation failures return
    /// before that point.
    pub fn mount(self, root: T) -> Result<App<T>> {
        run(self.options, root)
    }
}

/// Live application instance; clones are handles to the same instance
pub struct App<T> {
    inner: Rc<AppInner<T>>,
}

struct AppInner<T> {
    id: Uuid,
    root: T,
    options: Options<T>,
    router: Rc<dyn Router>,
    store: RefCell<Option<Rc<dyn Store>>>,
    scheduler: RefCell<Option<Debounce<State>>>,
    mounted: Rc<Cell<bool>>,
}

impl<T> Clone for App<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for App<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.inner.id)
            .field("mounted", &self.inner.mounted.get())
            .finish()
    }
}

impl<T> App<T> {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn root(&self) -> &T {
        &self.inner.root
    }

    pub fn options(&self) -> &Options<T> {
        &self.inner.options
    }

    pub fn router(&self) -> Rc<dyn Router> {
        Rc::clone(&self.inner.router)
    }

    /// The state container; `None` once unmounted
    pub fn store(&self) -> Option<Rc<dyn Store>> {
        self.inner.store.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Whether a debounced render is waiting for its timer
    pub fn render_pending(&self) -> bool {
        self.inner
            .scheduler
            .borrow()
            .as_ref()
            .map(Debounce::is_pending)
            .unwrap_or(false)
    }

    pub fn state(&self) -> Result<State> {
        Ok(self.live_store()?.get())
    }

    pub fn split(&self, kind: &str, payload: Value) -> Result<()> {
        self.live_store()?.split(kind, payload)
    }

    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.live_store()?.dispatch(action)
    }

    pub fn navigate(&self, path: impl Into<String>) -> Result<()> {
        self.dispatch(Action::navigate(path))
    }

    /// Route currently held in state
    pub fn route(&self) -> Option<Route> {
        self.store().and_then(|store| store.get().route())
    }

    /// View descriptors for the current route, outermost first
    pub fn views(&self) -> Vec<ViewDescriptor> {
        match self.route() {
            Some(route) => self.inner.router.data(&route.pattern),
            None => Vec::new(),
        }
    }

    /// Stop the router, cancel any pending render, then unrender
    ///
    /// Returns a builder carrying the configuration captured at mount time.
    /// If `unrender` fails the application is still torn down and the error
    /// is returned instead of the builder; other handles keep the captured
    /// configuration through [`App::options`].
    pub fn unmount(self) -> Result<Moonwave<T>> {
        if !self.inner.mounted.replace(false) {
            return Err(MoonwaveError::NotMounted);
        }

        self.inner.router.stop();

        let scheduler = self.inner.scheduler.borrow_mut().take();
        if let Some(scheduler) = scheduler {
            if scheduler.cancel() {
                debug!(app = %self.inner.id, "Cancelled pending render");
            }
        }

        let result = match &self.inner.options.unrender {
            Some(unrender) => unrender(&self),
            None => Ok(()),
        };

        self.inner.store.borrow_mut().take();
        result?;

        info!(app = %self.inner.id, "Application unmounted");
        Ok(Moonwave::from_options(self.inner.options.clone()))
    }

    fn live_store(&self) -> Result<Rc<dyn Store>> {
        self.store().ok_or(MoonwaveError::NotMounted)
    }

    /// Undo a partially completed activation
    fn abandon(&self) {
        self.inner.mounted.set(false);
        self.inner.router.stop();
        if let Some(scheduler) = self.inner.scheduler.borrow_mut().take() {
            scheduler.cancel();
        }
        self.inner.store.borrow_mut().take();
    }
}

fn run<T: Clone + 'static>(mut options: Options<T>, root: T) -> Result<App<T>> {
    let actions = options.store.actions.get_or_insert_with(Actions::new).clone();
    let evolve = Rc::clone(options.store.evolve.get_or_insert_with(default_evolve));

    validate(&options)?;
    let render_factory = options
        .render
        .clone()
        .ok_or(ConfigurationError::MissingRender)?;

    let router = (options.router_factory)(&options.router)?;
    let evolve = with_routing(evolve, actions, Rc::clone(&router));

    let mounted = Rc::new(Cell::new(true));
    let app = App {
        inner: Rc::new(AppInner {
            id: Uuid::new_v4(),
            root,
            options: options.clone(),
            router: Rc::clone(&router),
            store: RefCell::new(None),
            scheduler: RefCell::new(None),
            mounted: Rc::clone(&mounted),
        }),
    };
    let app_id = app.id();

    let render = render_factory(&app);
    let scheduler = Debounce::new(options.frame_interval, move |snapshot: State| {
        trace!(app = %app_id, "Rendering");
        if let Err(e) = render(snapshot) {
            error!(app = %app_id, "Render failed: {}", e);
        }
    });

    let on_change: ChangeFn = {
        let scheduler = scheduler.clone();
        Rc::new(move |store: &dyn Store| {
            if mounted.get() {
                scheduler.call(store.get());
            }
        })
    };

    let store = (options.store_factory)(StoreConfig {
        initial: options.store.initial.clone(),
        evolve,
        on_change,
        extra: options.store.extra.clone(),
    })?;

    *app.inner.store.borrow_mut() = Some(Rc::clone(&store));
    *app.inner.scheduler.borrow_mut() = Some(scheduler);

    let on_transition = transition_listener(options.router.on_transition.clone(), store);
    if let Err(e) = router.start(on_transition) {
        app.abandon();
        return Err(e);
    }

    info!(
        app = %app_id,
        routes = options.router.routes.len(),
        "Application mounted"
    );
    Ok(app)
}

/// Listener handed to the router: the configured callback, or a shallow
/// `{route}` update of state
fn transition_listener(on_transition: Option<OnTransition>, store: Rc<dyn Store>) -> TransitionFn {
    match on_transition {
        Some(on_transition) => Rc::new(move |route: Route| on_transition(store.as_ref(), route)),
        None => Rc::new(move |route: Route| {
            let value = serde_json::to_value(&route)
                .map_err(|e| MoonwaveError::Routing(format!("failed to encode route: {}", e)))?;
            store.update(State::with(ROUTE_KEY, value))
        }),
    }
}

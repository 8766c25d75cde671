//! State container
//!
//! The container owns the current [`State`], runs every dispatched action
//! through its evolution function and notifies a change listener afterwards.
//! [`Atom`] is the default implementation; any type implementing [`Store`]
//! can be plugged in through a [`StoreFactory`].

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::action::Action;
use crate::error::Result;
use crate::state::State;

/// Evolution function as seen by the container: `(store, action)`
pub type StoreEvolveFn = Rc<dyn Fn(&dyn Store, Action) -> Result<()>>;

/// Change listener, invoked after every dispatch and update
pub type ChangeFn = Rc<dyn Fn(&dyn Store)>;

/// Builds a state container from its configuration
pub type StoreFactory = Rc<dyn Fn(StoreConfig) -> Result<Rc<dyn Store>>>;

/// Read/dispatch interface of a state container
pub trait Store {
    /// Current state snapshot
    fn get(&self) -> State;

    /// Process one action synchronously through evolution, then notify
    fn dispatch(&self, action: Action) -> Result<()>;

    /// Shallow-merge `patch` into state, then notify
    fn update(&self, patch: State) -> Result<()>;

    /// Dispatch by kind and payload
    fn split(&self, kind: &str, payload: Value) -> Result<()> {
        self.dispatch(Action::new(kind, payload)?)
    }
}

/// Everything a container needs at construction time
pub struct StoreConfig {
    pub initial: State,
    pub evolve: StoreEvolveFn,
    pub on_change: ChangeFn,

    /// Container-specific extension fields
    pub extra: Map<String, Value>,
}

/// Default synchronous state container
///
/// Re-entrant: action handlers may dispatch further actions or update state
/// while an outer dispatch is still running. No borrow of the state is held
/// while user code executes.
#[derive(Clone)]
pub struct Atom {
    inner: Rc<AtomInner>,
}

struct AtomInner {
    state: RefCell<State>,
    evolve: StoreEvolveFn,
    on_change: ChangeFn,
}

impl Atom {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Rc::new(AtomInner {
                state: RefCell::new(config.initial),
                evolve: config.evolve,
                on_change: config.on_change,
            }),
        }
    }

    /// Factory producing [`Atom`] containers
    pub fn factory() -> StoreFactory {
        Rc::new(|config: StoreConfig| Ok(Rc::new(Atom::new(config)) as Rc<dyn Store>))
    }

    fn notify(&self) {
        let on_change = Rc::clone(&self.inner.on_change);
        on_change(self as &dyn Store);
    }
}

impl Store for Atom {
    fn get(&self) -> State {
        self.inner.state.borrow().clone()
    }

    fn dispatch(&self, action: Action) -> Result<()> {
        trace!(kind = action.kind(), "Dispatching action");
        let evolve = Rc::clone(&self.inner.evolve);
        evolve(self as &dyn Store, action)?;
        self.notify();
        Ok(())
    }

    fn update(&self, patch: State) -> Result<()> {
        self.inner.state.borrow_mut().merge(patch);
        self.notify();
        Ok(())
    }
}

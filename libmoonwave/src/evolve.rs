//! Evolution functions
//!
//! [`with_routing`] is the single chokepoint every dispatched action passes
//! through before it reaches application code. Navigation actions are diverted
//! to the router; everything else is forwarded unchanged, synchronously and
//! exactly once.

use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::action::{Action, Actions, Navigation, NAVIGATE};
use crate::error::Result;
use crate::router::Router;
use crate::store::{Store, StoreEvolveFn};

/// Application evolution function: `(store, action, actions)`
pub type EvolveFn = Rc<dyn Fn(&dyn Store, Action, &Actions) -> Result<()>>;

/// Evolution used when the application supplies none: look up the handler
/// registered for the action's kind and call it with the payload
pub fn default_evolve() -> EvolveFn {
    Rc::new(|store: &dyn Store, action: Action, actions: &Actions| actions.dispatch(store, action))
}

/// Wrap `evolve` so navigation actions go to `router` instead
///
/// A navigation never touches state here; the new route reaches the store
/// through the router's transition callback.
pub fn with_routing(evolve: EvolveFn, actions: Actions, router: Rc<dyn Router>) -> StoreEvolveFn {
    Rc::new(move |store: &dyn Store, action: Action| {
        let action = match action {
            Action::Custom { kind, payload } if kind == NAVIGATE => Action::new(kind, payload)?,
            other => other,
        };

        match action {
            Action::Navigate(Navigation { path, extra }) => {
                debug!(path = %path, "Navigating");
                router.push(&path, extra.map(Value::Object))
            }
            other => evolve(store, other, &actions),
        }
    })
}

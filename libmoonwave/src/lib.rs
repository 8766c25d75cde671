//! Moonwave - application lifecycle orchestration
//!
//! Composes a state container, a router and a render function into one
//! mountable application. Dispatched actions flow through a single evolution
//! chokepoint, navigation actions are handed to the router, route transitions
//! are written back into state and state changes are rendered at most once
//! per frame.
//!
//! Everything runs on one thread: mount the application from inside a
//! [`tokio::task::LocalSet`].

pub mod action;
pub mod app;
pub mod error;
pub mod evolve;
pub mod logging;
pub mod router;
pub mod schedule;
pub mod settings;
pub mod state;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use action::{Action, Actions, Navigation, NAVIGATE};
pub use app::{App, Moonwave, Options};
pub use error::{ConfigurationError, MoonwaveError, Result, SettingsError};
pub use router::{MemoryRouter, MockRouter, Route, RouteDef, Router, RouterConfig, ViewDescriptor};
pub use settings::Settings;
pub use state::State;
pub use store::{Atom, Store};

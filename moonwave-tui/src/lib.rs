//! moonwave-tui library
//!
//! Mounts Moonwave applications onto a ratatui terminal: routes name views,
//! views nest inside each other and every debounced render redraws the
//! current route's view chain.

pub mod adapter;
pub mod cli;
pub mod demo;
pub mod error;
pub mod event;
pub mod terminal;
pub mod view;

// Re-export commonly used types
pub use adapter::{moonwave, root, Root};
pub use error::{Result, TuiError};
pub use view::{ViewFn, ViewProps, ViewRegistry};

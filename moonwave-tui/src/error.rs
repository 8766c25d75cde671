//! Error types for moonwave-tui
//!
//! Wraps lifecycle errors and terminal/IO errors for unified error handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Lifecycle error
    #[error("Moonwave error: {0}")]
    Core(#[from] libmoonwave::MoonwaveError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// A route names a view that was never registered
    #[error("Unknown view '{0}', register it with ViewRegistry::register")]
    UnknownView(String),
}

impl TuiError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Core(e) => e.exit_code(),
            TuiError::Terminal(_) => 1,
            TuiError::UnknownView(_) => 2,
        }
    }
}

impl From<TuiError> for libmoonwave::MoonwaveError {
    fn from(err: TuiError) -> Self {
        match err {
            TuiError::Core(e) => e,
            other => libmoonwave::MoonwaveError::Render(other.to_string()),
        }
    }
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;

//! Pre-activation checks
//!
//! Runs before any collaborator is constructed, so a failure here leaves
//! nothing behind. Route patterns are the router's business and are not
//! checked here.

use crate::action::NAVIGATE;
use crate::app::Options;
use crate::error::ConfigurationError;

/// Check that everything `mount` needs was supplied
pub fn validate<T>(options: &Options<T>) -> Result<(), ConfigurationError> {
    if options.render.is_none() {
        return Err(ConfigurationError::MissingRender);
    }
    if options.unrender.is_none() {
        return Err(ConfigurationError::MissingUnrender);
    }
    if options.router.routes.is_empty() {
        return Err(ConfigurationError::MissingRoutes);
    }
    if let Some(actions) = &options.store.actions {
        if actions.contains(NAVIGATE) {
            return Err(ConfigurationError::ReservedAction(NAVIGATE.to_string()));
        }
    }
    Ok(())
}

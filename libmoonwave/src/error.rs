//! Error types for Moonwave

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MoonwaveError>;

#[derive(Error, Debug)]
pub enum MoonwaveError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Unhandled action: no handler registered for '{0}'")]
    UnhandledAction(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Application is not mounted")]
    NotMounted,
}

impl MoonwaveError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MoonwaveError::Configuration(_) => 2,
            MoonwaveError::Settings(_) => 2,
            MoonwaveError::InvalidAction(_) => 3,
            MoonwaveError::UnhandledAction(_) => 3,
            MoonwaveError::InvalidState(_) => 3,
            MoonwaveError::Routing(_) => 1,
            MoonwaveError::Render(_) => 1,
            MoonwaveError::NotMounted => 1,
        }
    }
}

/// A required collaborator was not supplied before `mount`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing render implementation, provide with app.render(|app| move |state| ...)")]
    MissingRender,

    #[error("Missing unrender implementation, provide with app.unrender(|app| ...)")]
    MissingUnrender,

    #[error("Missing route map, provide with app.routes(vec![RouteDef::new(\"*\", \"app\")])")]
    MissingRoutes,

    #[error("Action kind '{0}' is reserved and cannot have a handler")]
    ReservedAction(String),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_configuration_error() {
        let error = MoonwaveError::Configuration(ConfigurationError::MissingRender);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_unhandled_action() {
        let error = MoonwaveError::UnhandledAction("increment".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_invalid_state_message() {
        let error = MoonwaveError::InvalidState("state must be an object, got 3".to_string());
        assert_eq!(error.to_string(), "Invalid state: state must be an object, got 3");
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_routing_error() {
        let error = MoonwaveError::Routing("no route matches '/missing'".to_string());
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_names_missing_render() {
        let error = MoonwaveError::from(ConfigurationError::MissingRender);
        let message = format!("{}", error);
        assert!(message.starts_with("Configuration error: Missing render implementation"));
    }

    #[test]
    fn test_error_message_names_missing_unrender() {
        let message = ConfigurationError::MissingUnrender.to_string();
        assert!(message.contains("unrender"));
    }

    #[test]
    fn test_error_message_names_missing_routes() {
        let message = ConfigurationError::MissingRoutes.to_string();
        assert!(message.contains("route map"));
    }

    #[test]
    fn test_error_message_unhandled_action() {
        let error = MoonwaveError::UnhandledAction("increment".to_string());
        assert_eq!(
            error.to_string(),
            "Unhandled action: no handler registered for 'increment'"
        );
    }

    #[test]
    fn test_settings_error_invalid_value() {
        let error = SettingsError::InvalidValue {
            field: "app.frame_interval".to_string(),
            reason: "expected a duration".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for app.frame_interval: expected a duration"
        );
    }
}

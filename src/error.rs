//! Error types for the teleop panel
//!
//! One error enum for the whole crate. Nothing here is fatal to a running
//! session: callers log the error and surface `user_message()` in the panel.

use thiserror::Error;

/// Teleop errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeleopError {
    /// A script or static script file could not be read
    #[error("Could not read script '{path}': {reason}")]
    ScriptLoadError { path: String, reason: String },

    /// A script file was readable but had no lines to navigate
    #[error("Script '{0}' has no lines")]
    EmptyScriptError(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The outbound robot link rejected a message
    #[error("Robot link error: {0}")]
    LinkError(String),

    /// Channel communication error
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for TeleopError {
    fn from(e: std::io::Error) -> Self {
        TeleopError::IOError(e.to_string())
    }
}

impl TeleopError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the session usable as-is; the others need the
    /// operator to fix a file or restart the robot bridge.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Previous script stays active
            TeleopError::ScriptLoadError { .. } => true,
            TeleopError::EmptyScriptError(_) => true,
            TeleopError::ConfigError(_) => false,
            // A dropped message; the next one may go through
            TeleopError::LinkError(_) => true,
            // Worker or bridge is gone
            TeleopError::ChannelError(_) => false,
            TeleopError::IOError(_) => false,
        }
    }

    /// Get a one-line description suitable for the advisory label
    pub fn user_message(&self) -> String {
        match self {
            TeleopError::ScriptLoadError { .. } | TeleopError::EmptyScriptError(_) => {
                "Could not read script file!".to_string()
            }
            TeleopError::ConfigError(_) => {
                "Configuration error. Please check your config file.".to_string()
            }
            TeleopError::LinkError(_) => {
                "Could not send command to robot. Command abandoned.".to_string()
            }
            TeleopError::ChannelError(_) => {
                "Lost connection to the dispatcher. Please restart.".to_string()
            }
            TeleopError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

/// Result type alias for teleop operations
pub type Result<T> = std::result::Result<T, TeleopError>;

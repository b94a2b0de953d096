//! Error types and handling infrastructure for hotbind.
//!
//! The dispatch core never fails at runtime: unbound, half-bound or unmatched input simply
//! degrades to "this action stays unbound". Errors are reserved for the edges of the system:
//!
//! - **Construction**: an action set that violates its invariants (duplicate ids, inverted ranges)
//! - **Event sources**: terminal or gamepad backends that fail to initialise or read
//! - **Configuration**: loading or saving settings and persisted bindings

use thiserror::Error;

/// The main error type for hotbind operations.
#[derive(Error, Debug)]
pub enum HotbindError {
    /// Two actions in one set share an id
    #[error("Duplicate action id: {id}")]
    DuplicateActionId { id: String },

    /// A range action whose lower bound exceeds its upper bound
    #[error("Invalid range for action {id}: min {min} is greater than max {max}")]
    InvalidRange { id: String, min: f64, max: f64 },

    /// A step size or range bound that is NaN or infinite
    #[error("Invalid number for action {id}: {message}")]
    InvalidNumber { id: String, message: String },

    /// Terminal / OS level I/O failures while reading input or drawing
    #[error("I/O operation failed: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Gamepad backend could not be initialised or polled
    #[error("Gamepad error: {message}")]
    GamepadError { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Standard Result type for hotbind operations.
pub type Result<T> = std::result::Result<T, HotbindError>;

impl HotbindError {
    /// Create an Io error with additional context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a GamepadError with a descriptive message
    pub fn gamepad(message: impl Into<String>) -> Self {
        Self::GamepadError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for HotbindError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::Io {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::Io {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::Io {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

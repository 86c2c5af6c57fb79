//! Error type for bridge operations.

use sysrepo_types::SrStatus;
use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised on the Rust side of the sysrepo boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("Null pointer received from sysrepo")]
    NullPointer,

    #[error("String contains an interior NUL byte")]
    InteriorNul,

    #[error("Handler already registered: {key}")]
    AlreadyRegistered { key: String },

    #[error("Handler not registered: {key}")]
    NotRegistered { key: String },

    #[error("Unknown {what} value {raw}")]
    UnknownValue { what: &'static str, raw: i32 },

    #[error("{operation} failed: {message} ({code})")]
    Native {
        operation: &'static str,
        code: i32,
        message: &'static str,
    },

    #[error("{operation} called without the sysrepo-link feature")]
    NotLinked { operation: &'static str },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl BridgeError {
    /// Creates an already-registered error.
    pub fn already_registered(key: impl Into<String>) -> Self {
        Self::AlreadyRegistered { key: key.into() }
    }

    /// Creates a not-registered error.
    pub fn not_registered(key: impl Into<String>) -> Self {
        Self::NotRegistered { key: key.into() }
    }

    /// Creates an error from a failing native call's return code.
    pub fn native(operation: &'static str, code: i32) -> Self {
        let message = SrStatus::from_raw(code)
            .map(SrStatus::message)
            .unwrap_or("Unknown status");
        Self::Native {
            operation,
            code,
            message,
        }
    }

    /// Creates a not-linked error.
    pub fn not_linked(operation: &'static str) -> Self {
        Self::NotLinked { operation }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the native status this error should be reported as.
    pub fn status(&self) -> SrStatus {
        match self {
            BridgeError::NullPointer
            | BridgeError::InteriorNul
            | BridgeError::UnknownValue { .. } => SrStatus::InvalArg,
            BridgeError::AlreadyRegistered { .. } => SrStatus::DataExists,
            BridgeError::NotRegistered { .. } => SrStatus::Internal,
            BridgeError::Native { code, .. } => {
                SrStatus::from_raw(*code).unwrap_or(SrStatus::Internal)
            }
            BridgeError::NotLinked { .. } => SrStatus::Unsupported,
            BridgeError::Config { .. } => SrStatus::InvalArg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_display() {
        let err = BridgeError::native("sr_get_items", 3);
        assert_eq!(err.to_string(), "sr_get_items failed: Item not found (3)");
        assert_eq!(err.status(), SrStatus::NotFound);

        let err = BridgeError::native("sr_get_items", 77);
        assert_eq!(err.to_string(), "sr_get_items failed: Unknown status (77)");
        assert_eq!(err.status(), SrStatus::Internal);
    }

    #[test]
    fn test_registration_errors() {
        let err = BridgeError::already_registered("ietf-interfaces");
        assert_eq!(err.to_string(), "Handler already registered: ietf-interfaces");
        assert_eq!(err.status(), SrStatus::DataExists);

        let err = BridgeError::not_registered("/a:b");
        assert_eq!(err.status(), SrStatus::Internal);
    }

    #[test]
    fn test_callback_argument_errors() {
        assert_eq!(BridgeError::NullPointer.status(), SrStatus::InvalArg);
        let err = BridgeError::UnknownValue {
            what: "sr_notif_event_t",
            raw: 42,
        };
        assert_eq!(err.to_string(), "Unknown sr_notif_event_t value 42");
        assert_eq!(err.status(), SrStatus::InvalArg);
    }

    #[test]
    fn test_not_linked() {
        let err = BridgeError::not_linked("sr_set_error");
        assert_eq!(
            err.to_string(),
            "sr_set_error called without the sysrepo-link feature"
        );
        assert_eq!(err.status(), SrStatus::Unsupported);
    }
}

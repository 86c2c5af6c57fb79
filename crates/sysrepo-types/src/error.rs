//! Error types for the sysrepo value model.
//!
//! Two kinds of failure live here: [`SrStatus`], the status codes returned by
//! the native library (`sr_error_t`), and [`TypesError`], the errors raised
//! by the pure-Rust helpers in this crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for value-model operations.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors raised while parsing names, xpaths and change values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// A textual name did not match any known constant.
    #[error("unknown {kind} '{name}'")]
    UnknownName {
        /// The type being parsed (e.g. "SrType").
        kind: &'static str,
        /// The rejected input.
        name: String,
    },

    /// An xpath expression could not be split into nodes.
    #[error("invalid xpath '{xpath}': {reason}")]
    InvalidXPath {
        /// The offending expression.
        xpath: String,
        /// What went wrong.
        reason: &'static str,
    },

    /// A change value carried no value for its operation.
    #[error("change {oper} has no value")]
    MissingValue {
        /// The operation name (e.g. "SR_OP_CREATED").
        oper: &'static str,
    },
}

impl TypesError {
    /// Creates an unknown-name error.
    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }

    /// Creates an invalid-xpath error.
    pub fn invalid_xpath(xpath: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidXPath {
            xpath: xpath.into(),
            reason,
        }
    }
}

/// Status codes matching `sr_error_t` in `sysrepo.h`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrStatus {
    Ok = 0,
    InvalArg = 1,
    NoMem = 2,
    NotFound = 3,
    Internal = 4,
    InitFailed = 5,
    Io = 6,
    Disconnect = 7,
    MalformedMsg = 8,
    Unsupported = 9,
    UnknownModel = 10,
    BadElement = 11,
    ValidationFailed = 12,
    OperationFailed = 13,
    DataExists = 14,
    DataMissing = 15,
    Unauthorized = 16,
    InvalUser = 17,
    Locked = 18,
    TimeOut = 19,
    RestartNeeded = 20,
    VersionMismatch = 21,
}

impl SrStatus {
    /// All status codes in header order.
    pub const ALL: &'static [SrStatus] = &[
        SrStatus::Ok,
        SrStatus::InvalArg,
        SrStatus::NoMem,
        SrStatus::NotFound,
        SrStatus::Internal,
        SrStatus::InitFailed,
        SrStatus::Io,
        SrStatus::Disconnect,
        SrStatus::MalformedMsg,
        SrStatus::Unsupported,
        SrStatus::UnknownModel,
        SrStatus::BadElement,
        SrStatus::ValidationFailed,
        SrStatus::OperationFailed,
        SrStatus::DataExists,
        SrStatus::DataMissing,
        SrStatus::Unauthorized,
        SrStatus::InvalUser,
        SrStatus::Locked,
        SrStatus::TimeOut,
        SrStatus::RestartNeeded,
        SrStatus::VersionMismatch,
    ];

    /// Creates a status from a raw `sr_error_t` value.
    ///
    /// Returns `None` for values outside the known range.
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    /// Returns the raw `sr_error_t` value.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_ok(self) -> bool {
        self == SrStatus::Ok
    }

    /// Converts to a Result, returning `Ok(())` for success.
    pub fn into_result(self) -> Result<(), SrStatus> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Returns the C constant name.
    pub fn name(self) -> &'static str {
        match self {
            SrStatus::Ok => "SR_ERR_OK",
            SrStatus::InvalArg => "SR_ERR_INVAL_ARG",
            SrStatus::NoMem => "SR_ERR_NOMEM",
            SrStatus::NotFound => "SR_ERR_NOT_FOUND",
            SrStatus::Internal => "SR_ERR_INTERNAL",
            SrStatus::InitFailed => "SR_ERR_INIT_FAILED",
            SrStatus::Io => "SR_ERR_IO",
            SrStatus::Disconnect => "SR_ERR_DISCONNECT",
            SrStatus::MalformedMsg => "SR_ERR_MALFORMED_MSG",
            SrStatus::Unsupported => "SR_ERR_UNSUPPORTED",
            SrStatus::UnknownModel => "SR_ERR_UNKNOWN_MODEL",
            SrStatus::BadElement => "SR_ERR_BAD_ELEMENT",
            SrStatus::ValidationFailed => "SR_ERR_VALIDATION_FAILED",
            SrStatus::OperationFailed => "SR_ERR_OPERATION_FAILED",
            SrStatus::DataExists => "SR_ERR_DATA_EXISTS",
            SrStatus::DataMissing => "SR_ERR_DATA_MISSING",
            SrStatus::Unauthorized => "SR_ERR_UNAUTHORIZED",
            SrStatus::InvalUser => "SR_ERR_INVAL_USER",
            SrStatus::Locked => "SR_ERR_LOCKED",
            SrStatus::TimeOut => "SR_ERR_TIME_OUT",
            SrStatus::RestartNeeded => "SR_ERR_RESTART_NEEDED",
            SrStatus::VersionMismatch => "SR_ERR_VERSION_MISMATCH",
        }
    }

    /// Returns the human readable message for this status, as printed by
    /// `sr_strerror`.
    pub fn message(self) -> &'static str {
        match self {
            SrStatus::Ok => "Operation succeeded",
            SrStatus::InvalArg => "Invalid argument",
            SrStatus::NoMem => "Out of memory",
            SrStatus::NotFound => "Item not found",
            SrStatus::Internal => "Sysrepo-internal error",
            SrStatus::InitFailed => "Initialization failed",
            SrStatus::Io => "Input/Output error",
            SrStatus::Disconnect => "The peer disconnected",
            SrStatus::MalformedMsg => "Malformed message",
            SrStatus::Unsupported => "Operation not supported",
            SrStatus::UnknownModel => "Requested schema model is not known",
            SrStatus::BadElement => "Request contains unknown element",
            SrStatus::ValidationFailed => "Validation of the changes failed",
            SrStatus::OperationFailed => "Operation failed",
            SrStatus::DataExists => "Item already exists",
            SrStatus::DataMissing => "Item does not exist",
            SrStatus::Unauthorized => "Operation not authorized",
            SrStatus::InvalUser => "Invalid username",
            SrStatus::Locked => "Requested resource is already locked",
            SrStatus::TimeOut => "Timeout has expired",
            SrStatus::RestartNeeded => "Sysrepo Engine restart is needed",
            SrStatus::VersionMismatch => "Incompatible client library used",
        }
    }

    /// Renders a raw status for logs, falling back to `SrStatus(n)` for
    /// unknown values.
    pub fn describe_raw(raw: i32) -> String {
        match Self::from_raw(raw) {
            Some(status) => status.to_string(),
            None => format!("SrStatus({})", raw),
        }
    }
}

impl fmt::Display for SrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for SrStatus {}

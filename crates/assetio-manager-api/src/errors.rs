//! Error types shared by hosts and managers

use crate::{Access, EntityReference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for API operations
pub type ApiResult<T> = Result<T, AssetIoError>;

/// Outcome of a single element of a batch call
pub type BatchElementResult<T> = Result<T, BatchElementError>;

// ============================================================================
// Batch element errors
// ============================================================================

/// Category of a per-element failure reported by a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Fallback for errors that fit no other category
    Unknown,
    /// The reference is well formed but not recognised by the manager
    InvalidEntityReference,
    /// The reference could not be parsed
    MalformedEntityReference,
    /// The entity cannot be accessed with the requested access mode
    EntityAccessError,
    /// The entity exists but its data could not be resolved
    EntityResolutionError,
    /// A preflight hint was rejected
    InvalidPreflightHint,
    /// The requested traits are not valid for the entity
    InvalidTraitSet,
    /// Authentication or authorization failed
    AuthError,
}

impl ErrorCode {
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::InvalidEntityReference => "invalidEntityReference",
            ErrorCode::MalformedEntityReference => "malformedEntityReference",
            ErrorCode::EntityAccessError => "entityAccessError",
            ErrorCode::EntityResolutionError => "entityResolutionError",
            ErrorCode::InvalidPreflightHint => "invalidPreflightHint",
            ErrorCode::InvalidTraitSet => "invalidTraitSet",
            ErrorCode::AuthError => "authError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure scoped to one index of a batch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchElementError {
    pub code: ErrorCode,
    pub message: String,
}

impl BatchElementError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for BatchElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Render the message for a batch element error surfaced as an
/// [`AssetIoError::BatchElement`].
///
/// Format: `<code>: <message> [index=<i>] [access=<access>] [entity=<ref>]`,
/// with the access and entity sections omitted when not known.
pub fn batch_element_exception_message(
    error: &BatchElementError,
    index: usize,
    entity_reference: Option<&EntityReference>,
    access: Option<Access>,
) -> String {
    let mut message = format!("{}: ", error.code);
    if !error.message.is_empty() {
        message.push_str(&error.message);
        message.push(' ');
    }
    message.push_str(&format!("[index={}]", index));
    if let Some(access) = access {
        message.push_str(&format!(" [access={}]", access));
    }
    if let Some(entity_reference) = entity_reference {
        message.push_str(&format!(" [entity={}]", entity_reference));
    }
    message
}

// ============================================================================
// API errors
// ============================================================================

/// Errors returned synchronously by API calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetIoError {
    /// The manager does not meet the host's requirements
    #[error("{message}")]
    Configuration { message: String },

    /// Caller-supplied arguments are malformed. Never reported per element.
    #[error("{message}")]
    InputValidation { message: String },

    /// A per-element failure converted into an error by an exception-style
    /// call shape
    #[error("{message}")]
    BatchElement {
        index: usize,
        error: BatchElementError,
        message: String,
    },

    /// The manager does not implement the requested method
    #[error("{message}")]
    NotImplemented { message: String },

    /// Anything else, including manager contract violations
    #[error("{message}")]
    Unhandled { message: String },
}

impl AssetIoError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an input validation error
    pub fn input_validation(message: impl Into<String>) -> Self {
        Self::InputValidation {
            message: message.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Create an unhandled error
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
        }
    }

    /// Human-readable message, identical to the `Display` output
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message }
            | Self::InputValidation { message }
            | Self::BatchElement { message, .. }
            | Self::NotImplemented { message }
            | Self::Unhandled { message } => message,
        }
    }
}

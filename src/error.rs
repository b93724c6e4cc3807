//! Error types for soapxsd
//!
//! This module defines all error types used throughout the library.
//! Resolution and decode errors propagate to the immediate caller; there is
//! no internal retry and no silent defaulting.

use std::fmt;
use thiserror::Error;

use crate::names::QName;

/// Result type alias using soapxsd Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for soapxsd operations
#[derive(Error, Debug)]
pub enum Error {
    /// A qualified name has no entry in the type registry
    #[error("type not found: {0}")]
    TypeNotFound(QName),

    /// A reference could not be resolved during a resolution pass
    #[error("unresolved reference: {0}")]
    UnresolvedReference(QName),

    /// Malformed scalar text handed to a simple type's decoder
    #[error("decode error: {0}")]
    ScalarDecode(#[from] ScalarDecodeError),

    /// Simple type constructed with the wrong argument count or keyword
    #[error("{type_name}() {detail}. Simple types expect only a single value argument")]
    Arity {
        /// Name of the simple type being constructed
        type_name: String,
        /// What was wrong with the supplied arguments
        detail: String,
    },

    /// Union-type marshaling is explicitly unimplemented
    #[error("union type '{type_name}' does not support {operation}")]
    UnsupportedUnion {
        /// Name of the union type
        type_name: String,
        /// The operation that was attempted
        operation: &'static str,
    },

    /// A field name the bound type does not declare
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField {
        /// Name of the compound value's bound type
        type_name: String,
        /// The offending field name
        field: String,
    },

    /// Value error (invalid value for an operation)
    #[error("value error: {0}")]
    Value(String),

    /// XML reading error
    #[error("XML error: {0}")]
    Xml(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Scalar decode failure with the offending type and text
#[derive(Debug, Clone)]
pub struct ScalarDecodeError {
    /// Name of the simple type whose decoder failed
    pub type_name: String,
    /// The text that could not be decoded
    pub text: String,
    /// Decoder-specific reason
    pub reason: Option<String>,
}

impl ScalarDecodeError {
    /// Create a new scalar decode error
    pub fn new(type_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            text: text.into(),
            reason: None,
        }
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for ScalarDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.text, self.type_name)?;

        if let Some(ref reason) = self.reason {
            write!(f, " ({})", reason)?;
        }

        Ok(())
    }
}

impl std::error::Error for ScalarDecodeError {}

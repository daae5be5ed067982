//! Error types for configuration conversion.
//!
//! Every converter returns [`Result`]. Errors are never retried or recovered
//! locally; they travel unchanged to the caller, so each message names the
//! field, dialect, group or tag that caused it.

use thiserror::Error;

/// Main error type for declsync conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A required value was absent
    #[error("Required value is absent: {field}")]
    NilInput { field: String },

    /// No branch of an exactly-one-of group was populated
    #[error("No variant selected for {group}")]
    MissingVariantSelection { group: String },

    /// The selected branch failed validation of its required fields
    #[error("Invalid variant selection: {0}")]
    InvalidVariantSelection(String),

    /// The wire carried a tag this build cannot represent
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// A connection reference was empty
    #[error("Missing connection reference: {context}")]
    MissingConnectionReference { context: String },

    /// Ambient setup failure (logging, I/O plumbing)
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience type alias for Results with ConvertError
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Creates an error for an absent required value
    pub fn nil_input(field: impl Into<String>) -> Self {
        Self::NilInput {
            field: field.into(),
        }
    }

    /// Creates an error for a group with no populated branch
    pub fn missing_variant(group: impl Into<String>) -> Self {
        Self::MissingVariantSelection {
            group: group.into(),
        }
    }

    /// Creates an error for a selected branch that failed validation
    pub fn invalid_variant(message: impl Into<String>) -> Self {
        Self::InvalidVariantSelection(message.into())
    }

    /// Creates the error for a field-form endpoint with missing fields.
    ///
    /// # Example
    /// ```rust
    /// use declsync_core::ConvertError;
    ///
    /// let err = ConvertError::incomplete_field_form("postgres");
    /// assert_eq!(
    ///     err,
    ///     ConvertError::InvalidVariantSelection("postgres: incomplete field-form".to_string())
    /// );
    /// ```
    pub fn incomplete_field_form(dialect: &str) -> Self {
        Self::InvalidVariantSelection(format!("{dialect}: incomplete field-form"))
    }

    /// Creates an error for an unrecognized wire tag
    pub fn unsupported_variant(tag: impl Into<String>) -> Self {
        Self::UnsupportedVariant(tag.into())
    }

    /// Creates an error for an unrecognized enumeration code
    pub fn unsupported_code(field: &str, code: i32) -> Self {
        Self::UnsupportedVariant(format!("{field}={code}"))
    }

    /// Creates an error for an empty connection reference
    pub fn missing_connection_reference(context: impl Into<String>) -> Self {
        Self::MissingConnectionReference {
            context: context.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns true when the error means this build's schema is older than
    /// the server's. Such errors are not transient and must not be retried.
    pub const fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::UnsupportedVariant(_))
    }
}

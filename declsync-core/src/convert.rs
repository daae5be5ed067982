//! Bidirectional conversion between the configuration and wire models.
//!
//! Every resource kind implements the same pair of traits:
//! - [`ToWire`] (encode): validates the configuration tree and builds the
//!   wire message;
//! - [`FromWire`] (decode, "hydration"): rebuilds the configuration tree from
//!   a wire message.
//!
//! Converters are pure functions over value trees. They hold no state, do
//! no I/O and may be called concurrently without coordination.
//!
//! # Example
//! ```rust
//! use declsync_core::convert::{FromWire, ToWire};
//! use declsync_core::models::{ConnectionConfig, PostgresConnection};
//!
//! let config = ConnectionConfig::Postgres(PostgresConnection::url("postgres://x"));
//! let wire = config.to_wire()?;
//! assert_eq!(ConnectionConfig::from_wire(&wire)?, config);
//! # Ok::<(), declsync_core::ConvertError>(())
//! ```

pub mod connection;
pub mod destination;
pub mod hook;
pub mod job;
pub mod source;
pub mod transformer;

use crate::error::{ConvertError, Result};

/// Encode direction: configuration model → wire model.
pub trait ToWire {
    /// The wire message this value encodes into.
    type Wire;

    /// Builds the wire message.
    ///
    /// # Errors
    /// Any [`ConvertError`] except `UnsupportedVariant`, which is decode-only.
    fn to_wire(&self) -> Result<Self::Wire>;
}

/// Decode direction: wire model → configuration model.
pub trait FromWire: Sized {
    /// The wire message this value decodes from.
    type Wire;

    /// Hydrates a configuration value.
    ///
    /// # Errors
    /// `UnsupportedVariant` for tags this build does not know, `NilInput` or
    /// `MissingVariantSelection` for absent required parts.
    fn from_wire(wire: &Self::Wire) -> Result<Self>;
}

impl<T: ToWire> ToWire for Vec<T> {
    type Wire = Vec<T::Wire>;

    fn to_wire(&self) -> Result<Self::Wire> {
        self.iter().map(ToWire::to_wire).collect()
    }
}

impl<T: FromWire> FromWire for Vec<T> {
    type Wire = Vec<T::Wire>;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        wire.iter().map(T::from_wire).collect()
    }
}

/// Encodes an optional sub-tree; absent stays absent.
pub(crate) fn encode_optional<T: ToWire>(value: Option<&T>) -> Result<Option<T::Wire>> {
    value.map(ToWire::to_wire).transpose()
}

/// Decodes an optional sub-tree; absent stays absent.
pub(crate) fn decode_optional<T: FromWire>(wire: Option<&T::Wire>) -> Result<Option<T>> {
    wire.map(T::from_wire).transpose()
}

/// Rejects an empty connection reference, naming where it was expected.
pub(crate) fn require_connection_id(context: &str, connection_id: &str) -> Result<String> {
    if connection_id.is_empty() {
        return Err(ConvertError::missing_connection_reference(context));
    }
    Ok(connection_id.to_string())
}

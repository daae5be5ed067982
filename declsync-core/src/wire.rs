//! Wire model exchanged with the remote service.
//!
//! Field names and tag identifiers in this module are a compatibility
//! boundary: renaming any of them breaks every stored configuration.
//!
//! Conventions:
//! - oneofs are externally tagged enums (`{"pg_config": {...}}`) declared
//!   with `wire_oneof!`, ending in an `Unknown` catch-all for tags from newer
//!   servers and a `Malformed` catch-all for declared tags whose payload does
//!   not decode;
//! - a top-level oneof sits in a wrapper struct with an optional field, the
//!   way a protobuf message holds its `oneof`;
//! - integers are 32-bit where the service uses 32-bit fields;
//! - every struct tolerates missing fields (`#[serde(default)]`).

pub mod connection;
pub mod destination;
pub mod hook;
pub mod job;
pub mod source;
pub mod transformer;

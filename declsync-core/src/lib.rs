//! Core conversion layer for declsync.
//!
//! Resources of the data-sync platform (connections, job sources and
//! destinations, transformers, hooks, jobs) exist in two shapes:
//! - the declarative configuration model in [`models`], edited by people
//!   and tools;
//! - the wire model in [`wire`], exchanged with the remote service.
//!
//! [`convert`] translates between them through the [`ToWire`] and
//! [`FromWire`] traits. All conversions are pure and synchronous.
//!
//! # Security Guarantees
//! - Credentials are held in [`security::Secret`] and never printed
//! - Connection URLs are redacted before they are logged
//!
//! # Architecture
//! - Variant groups are enums; front-end slot form is resolved by
//!   [`variant::select_one`] in a fixed declared order
//! - Every wire oneof captures unknown tags and malformed payloads so
//!   decoding can report them precisely
//! - One error taxonomy, [`ConvertError`], for every converter

pub mod convert;
pub mod error;
pub mod logging;
pub mod models;
pub mod optional;
pub mod security;
pub mod variant;
pub mod wire;

// Re-export commonly used types
pub use convert::{FromWire, ToWire};
pub use error::{ConvertError, Result};
pub use models::{
    ConnectionConfig, DestinationOptions, Job, JobDestination, JobHook, JobSource,
    TransformerConfig,
};
pub use variant::{Empty, MalformedPayload, UnknownTag};

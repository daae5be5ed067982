//! Job destination configuration.

use crate::variant::{Empty, variant_group};
use serde::{Deserialize, Serialize};

/// A destination: the connection to write to and how to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDestination {
    pub connection_id: String,
    pub options: DestinationOptions,
}

impl JobDestination {
    /// Creates a destination writing to `connection_id`.
    pub fn new(connection_id: impl Into<String>, options: DestinationOptions) -> Self {
        Self {
            connection_id: connection_id.into(),
            options,
        }
    }
}

variant_group! {
    /// Per-dialect write options.
    pub enum DestinationOptions / DestinationOptionsSlots as "destination options" {
        /// Write into Postgres
        Postgres(PostgresDestinationOptions) => postgres,
        /// Write into MySQL
        Mysql(MysqlDestinationOptions) => mysql,
        /// Write objects; no options today
        ObjectStore(Empty) => aws_s3,
    }
}

/// Placeholder for a destination setting that exists on the wire but is not
/// yet configurable. Supporting it means adding a variant here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reserved {
    /// Always encoded as absent (or false)
    #[default]
    Unimplemented,
}

/// Postgres destination options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostgresDestinationOptions {
    /// Emitted only when present
    pub truncate_table: Option<PostgresTruncateTable>,
    #[serde(default)]
    pub init_table_schema: bool,
    #[serde(skip)]
    pub on_conflict: Reserved,
    #[serde(skip)]
    pub skip_foreign_key_violations: Reserved,
    #[serde(skip)]
    pub batch: Reserved,
    #[serde(skip)]
    pub max_in_flight: Reserved,
}

/// Truncation behaviour before a Postgres run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresTruncateTable {
    #[serde(default)]
    pub truncate_before_insert: bool,
    #[serde(default)]
    pub cascade: bool,
}

/// MySQL destination options. Mirrors Postgres minus `cascade`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MysqlDestinationOptions {
    /// Emitted only when present
    pub truncate_table: Option<MysqlTruncateTable>,
    #[serde(default)]
    pub init_table_schema: bool,
    #[serde(skip)]
    pub on_conflict: Reserved,
    #[serde(skip)]
    pub skip_foreign_key_violations: Reserved,
    #[serde(skip)]
    pub batch: Reserved,
    #[serde(skip)]
    pub max_in_flight: Reserved,
}

/// Truncation behaviour before a MySQL run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlTruncateTable {
    #[serde(default)]
    pub truncate_before_insert: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_destination_slot_form() {
        let destination: JobDestination = serde_json::from_value(json!({
            "connection_id": "dest-1",
            "options": {
                "postgres": {
                    "truncate_table": {"truncate_before_insert": true, "cascade": true},
                    "init_table_schema": true
                }
            }
        }))
        .expect("deserialize");

        let DestinationOptions::Postgres(options) = &destination.options else {
            panic!("expected postgres options");
        };
        assert_eq!(
            options.truncate_table,
            Some(PostgresTruncateTable {
                truncate_before_insert: true,
                cascade: true
            })
        );
        assert_eq!(options.on_conflict, Reserved::Unimplemented);
    }

    #[test]
    fn test_reserved_fields_are_not_serialized() {
        let options = DestinationOptions::Mysql(MysqlDestinationOptions::default());
        let value = serde_json::to_value(&options).expect("serialize");
        assert_eq!(
            value,
            json!({"mysql": {"truncate_table": null, "init_table_schema": false}})
        );
    }
}

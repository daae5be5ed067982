//! Job destination messages.
//!
//! `on_conflict`, `skip_foreign_key_violations`, `batch` and `max_in_flight`
//! exist on the wire but are not configurable yet; encoding always sends
//! them absent or false.

use crate::variant::{Empty, wire_oneof};
use serde::{Deserialize, Serialize};

/// Job destination message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDestination {
    pub connection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JobDestinationOptions>,
}

wire_oneof! {
    /// Destination kind oneof.
    pub enum JobDestinationOptions {
        PostgresOptions(PostgresDestinationOptions) = "postgres_options",
        MysqlOptions(MysqlDestinationOptions) = "mysql_options",
        AwsS3Options(Empty) = "aws_s3_options",
    }
}

/// Postgres destination options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresDestinationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate_table: Option<PostgresTruncateTableConfig>,
    pub init_table_schema: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_conflict: Option<OnConflictConfig>,
    pub skip_foreign_key_violations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<u32>,
}

/// MySQL destination options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlDestinationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate_table: Option<MysqlTruncateTableConfig>,
    pub init_table_schema: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_conflict: Option<OnConflictConfig>,
    pub skip_foreign_key_violations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<u32>,
}

/// Postgres truncation before insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresTruncateTableConfig {
    pub truncate_before_insert: bool,
    pub cascade: bool,
}

/// MySQL truncation before insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlTruncateTableConfig {
    pub truncate_before_insert: bool,
}

/// Reserved conflict handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnConflictConfig {
    pub do_nothing: bool,
}

/// Reserved batching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Names of the reserved fields that arrived populated.
fn reserved_fields(
    on_conflict: Option<&OnConflictConfig>,
    skip_foreign_key_violations: bool,
    batch: Option<&BatchConfig>,
    max_in_flight: Option<u32>,
) -> Vec<&'static str> {
    let mut populated = Vec::new();
    if on_conflict.is_some() {
        populated.push("on_conflict");
    }
    if skip_foreign_key_violations {
        populated.push("skip_foreign_key_violations");
    }
    if batch.is_some() {
        populated.push("batch");
    }
    if max_in_flight.is_some() {
        populated.push("max_in_flight");
    }
    populated
}

impl PostgresDestinationOptions {
    pub(crate) fn populated_reserved(&self) -> Vec<&'static str> {
        reserved_fields(
            self.on_conflict.as_ref(),
            self.skip_foreign_key_violations,
            self.batch.as_ref(),
            self.max_in_flight,
        )
    }
}

impl MysqlDestinationOptions {
    pub(crate) fn populated_reserved(&self) -> Vec<&'static str> {
        reserved_fields(
            self.on_conflict.as_ref(),
            self.skip_foreign_key_violations,
            self.batch.as_ref(),
            self.max_in_flight,
        )
    }
}

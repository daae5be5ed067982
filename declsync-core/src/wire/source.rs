//! Job source messages.

use crate::variant::{Empty, wire_oneof};
use serde::{Deserialize, Serialize};

/// Job source message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JobSourceOptions>,
}

wire_oneof! {
    /// Source kind oneof.
    pub enum JobSourceOptions {
        Postgres(PostgresSourceOptions) = "postgres",
        Mysql(MysqlSourceOptions) = "mysql",
        Generate(GenerateSourceOptions) = "generate",
        AwsS3(AwsS3SourceOptions) = "aws_s3",
    }
}

/// Postgres source options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSourceOptions {
    pub connection_id: String,
    pub schemas: Vec<SourceSchemaOption>,
    pub subset_by_foreign_key_constraints: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_column_addition_strategy: Option<PostgresNewColumnAdditionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_removal_strategy: Option<PostgresColumnRemovalStrategy>,
}

/// MySQL source options. There is no addition strategy for MySQL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlSourceOptions {
    pub connection_id: String,
    pub schemas: Vec<SourceSchemaOption>,
    pub subset_by_foreign_key_constraints: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_removal_strategy: Option<MysqlColumnRemovalStrategy>,
}

/// Schema filter shared by the SQL dialects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSchemaOption {
    pub schema: String,
    pub tables: Vec<SourceTableOption>,
}

/// Table filter with an optional row predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTableOption {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
}

wire_oneof! {
    /// What to do when the source gains a column.
    pub enum PostgresNewColumnAdditionStrategy {
        HaltJob(Empty) = "halt_job",
        AutoMap(Empty) = "auto_map",
    }
}

wire_oneof! {
    /// What to do when a Postgres source loses a column.
    ///
    /// Removal strategy messages are distinct per dialect on the wire even
    /// though they carry the same tags.
    pub enum PostgresColumnRemovalStrategy {
        HaltJob(Empty) = "halt_job",
        ContinueJob(Empty) = "continue_job",
    }
}

wire_oneof! {
    /// What to do when a MySQL source loses a column.
    pub enum MysqlColumnRemovalStrategy {
        HaltJob(Empty) = "halt_job",
        ContinueJob(Empty) = "continue_job",
    }
}

/// Synthetic data source options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSourceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fk_source_connection_id: Option<String>,
    pub schemas: Vec<GenerateSourceSchemaOption>,
}

/// Schema to generate rows for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSourceSchemaOption {
    pub schema: String,
    pub tables: Vec<GenerateSourceTableOption>,
}

/// Table and the number of rows to generate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSourceTableOption {
    pub table: String,
    pub row_count: i64,
}

/// Object-store source options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsS3SourceOptions {
    pub connection_id: String,
}

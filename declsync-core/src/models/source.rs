//! Job source configuration.

use crate::variant::{Empty, variant_group};
use serde::{Deserialize, Serialize};

variant_group! {
    /// Where a job reads its data from.
    pub enum JobSource / JobSourceSlots as "job source" {
        /// Copy from a Postgres connection
        Postgres(PostgresSource) => postgres,
        /// Copy from a MySQL connection
        Mysql(MysqlSource) => mysql,
        /// Synthesize rows instead of reading them
        Generate(GenerateSource) => generate,
        /// Read objects from an object-store connection
        ObjectStore(ObjectStoreSource) => aws_s3,
    }
}

variant_group! {
    /// What to do when the source gains a column the job does not map.
    pub enum NewColumnAdditionStrategy / NewColumnAdditionStrategySlots as "new column addition strategy" {
        /// Stop the run
        HaltJob(Empty) => halt_job,
        /// Map the column automatically
        AutoMap(Empty) => auto_map,
    }
}

variant_group! {
    /// What to do when a mapped column disappears from the source.
    ///
    /// One type serves every dialect; the wire keeps the per-dialect field.
    pub enum ColumnRemovalStrategy / ColumnRemovalStrategySlots as "column removal strategy" {
        /// Stop the run
        HaltJob(Empty) => halt_job,
        /// Drop the mapping and carry on
        ContinueJob(Empty) => continue_job,
    }
}

/// Per-schema table filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFilter {
    pub schema: String,
    #[serde(default)]
    pub tables: Vec<TableFilter>,
}

/// A table and an optional row filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFilter {
    pub table: String,
    pub where_clause: Option<String>,
}

impl TableFilter {
    /// Creates a filter for `table` with no where-clause.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    /// Builder method to set the where-clause.
    pub fn with_where_clause(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }
}

/// Postgres source options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostgresSource {
    pub connection_id: String,
    #[serde(default)]
    pub schemas: Vec<SchemaFilter>,
    #[serde(default)]
    pub subset_by_foreign_key_constraints: bool,
    /// When unset and `subset_by_foreign_key_constraints` is true, encoding
    /// falls back to [`NewColumnAdditionStrategy::HaltJob`].
    pub new_column_addition_strategy: Option<NewColumnAdditionStrategy>,
    pub column_removal_strategy: Option<ColumnRemovalStrategy>,
}

impl PostgresSource {
    /// Creates a source reading from `connection_id` with no filters.
    pub fn new(connection_id: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            ..Default::default()
        }
    }
}

/// MySQL source options. MySQL has no new-column strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MysqlSource {
    pub connection_id: String,
    #[serde(default)]
    pub schemas: Vec<SchemaFilter>,
    #[serde(default)]
    pub subset_by_foreign_key_constraints: bool,
    pub column_removal_strategy: Option<ColumnRemovalStrategy>,
}

impl MysqlSource {
    /// Creates a source reading from `connection_id` with no filters.
    pub fn new(connection_id: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            ..Default::default()
        }
    }
}

/// Generated-data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateSource {
    /// Connection whose schema supplies foreign-key relationships
    pub fk_source_connection_id: Option<String>,
    #[serde(default)]
    pub schemas: Vec<GenerateSchema>,
}

/// Tables to generate within one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateSchema {
    pub schema: String,
    #[serde(default)]
    pub tables: Vec<GenerateTable>,
}

/// A table and how many rows to generate for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateTable {
    pub table: String,
    pub row_count: i64,
}

/// Object-store source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreSource {
    pub connection_id: String,
}

//! Job aggregate and the option bags converted alongside it.

use crate::models::destination::JobDestination;
use crate::models::source::JobSource;
use crate::models::transformer::TransformerConfig;
use serde::{Deserialize, Serialize};

/// A complete job definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub cron_schedule: Option<String>,
    pub source: JobSource,
    #[serde(default)]
    pub destinations: Vec<JobDestination>,
    #[serde(default)]
    pub mappings: Vec<JobMapping>,
    #[serde(default)]
    pub virtual_foreign_keys: Vec<VirtualForeignKeyConstraint>,
    pub workflow_options: Option<WorkflowOptions>,
    pub sync_options: Option<ActivityOptions>,
}

impl Job {
    /// Creates a job with a source and nothing else.
    pub fn new(name: impl Into<String>, source: JobSource) -> Self {
        Self {
            name: name.into(),
            cron_schedule: None,
            source,
            destinations: Vec::new(),
            mappings: Vec::new(),
            virtual_foreign_keys: Vec::new(),
            workflow_options: None,
            sync_options: None,
        }
    }

    /// Builder method to add a destination.
    pub fn with_destination(mut self, destination: JobDestination) -> Self {
        self.destinations.push(destination);
        self
    }

    /// Builder method to add a column mapping.
    pub fn with_mapping(mut self, mapping: JobMapping) -> Self {
        self.mappings.push(mapping);
        self
    }
}

/// Which transformer applies to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMapping {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub transformer: TransformerConfig,
}

impl JobMapping {
    /// Creates a mapping for `schema.table.column`.
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        transformer: TransformerConfig,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
            transformer,
        }
    }
}

/// A relationship declared on the job rather than in the physical schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualForeignKeyConstraint {
    pub schema: String,
    pub table: String,
    /// Ordered; pairs positionally with `foreign_key.columns`
    #[serde(default)]
    pub columns: Vec<String>,
    pub foreign_key: VirtualForeignKey,
}

/// The referenced side of a [`VirtualForeignKeyConstraint`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualForeignKey {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Workflow-level timeouts, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    pub run_timeout: Option<i64>,
}

/// Per-activity timeouts (seconds) and retry policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOptions {
    pub schedule_to_close_timeout: Option<i64>,
    pub start_to_close_timeout: Option<i64>,
    pub retry_policy: Option<RetryPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Narrowed to 32 bits on the wire; out-of-range values become absent
    pub maximum_attempts: Option<i64>,
}

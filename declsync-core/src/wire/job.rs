//! Job messages.

use crate::wire::destination::JobDestination;
use crate::wire::source::JobSource;
use crate::wire::transformer::TransformerConfig;
use serde::{Deserialize, Serialize};

/// Job message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<JobSource>,
    pub destinations: Vec<JobDestination>,
    pub mappings: Vec<JobMapping>,
    pub virtual_foreign_keys: Vec<VirtualForeignKeyConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_options: Option<WorkflowOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_options: Option<ActivityOptions>,
}

/// Transformer applied to one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobMapping {
    pub schema: String,
    pub table: String,
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer: Option<TransformerConfig>,
}

/// Foreign key declared outside the physical schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualForeignKeyConstraint {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<VirtualForeignKey>,
}

/// Referenced side of a virtual foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualForeignKey {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// Whole-run options. Durations are seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_timeout: Option<i64>,
}

/// Sync activity options. Durations are seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_to_close_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

/// Activity retries; `maximum_attempts` is 32-bit on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_attempts: Option<i32>,
}

//! Job hook messages.

use crate::variant::{Empty, wire_oneof};
use serde::{Deserialize, Serialize};

/// Job hook message. `priority` is unsigned on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobHook {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub priority: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<JobHookConfig>,
}

wire_oneof! {
    /// Hook action oneof.
    pub enum JobHookConfig {
        Sql(JobSqlHook) = "sql",
    }
}

/// SQL statement run against a connection around the sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSqlHook {
    pub query: String,
    pub connection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<HookTiming>,
}

wire_oneof! {
    /// When the hook runs.
    pub enum HookTiming {
        PreSync(Empty) = "pre_sync",
        PostSync(Empty) = "post_sync",
    }
}

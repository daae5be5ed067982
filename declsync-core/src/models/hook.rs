//! Job hooks: side actions run around a sync.

use crate::variant::{Empty, variant_group};
use serde::{Deserialize, Serialize};

/// A named hook attached to a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobHook {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    /// Lower runs first. Clamped into `0..=u32::MAX` on the wire.
    #[serde(default)]
    pub priority: i64,
    pub config: Option<JobHookAction>,
}

impl JobHook {
    /// Creates an enabled hook with priority 0 and no action.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Builder method to set the action.
    pub fn with_action(mut self, action: JobHookAction) -> Self {
        self.config = Some(action);
        self
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }
}

variant_group! {
    /// What the hook does.
    pub enum JobHookAction / JobHookActionSlots as "job hook config" {
        /// Run a SQL statement against a connection
        Sql(SqlHook) => sql,
    }
}

variant_group! {
    /// When a hook runs relative to the data sync.
    pub enum HookTiming / HookTimingSlots as "hook timing" {
        PreSync(Empty) => pre_sync,
        PostSync(Empty) => post_sync,
    }
}

/// SQL hook action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlHook {
    pub query: String,
    /// Required when encoding
    pub connection_id: String,
    pub timing: Option<HookTiming>,
}

impl SqlHook {
    /// Creates a hook running `query` on `connection_id` with no timing.
    pub fn new(query: impl Into<String>, connection_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            connection_id: connection_id.into(),
            timing: None,
        }
    }

    /// Builder method to set the timing.
    pub fn with_timing(mut self, timing: HookTiming) -> Self {
        self.timing = Some(timing);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_slot_form() {
        let hook: JobHook = serde_json::from_value(json!({
            "name": "vacuum",
            "enabled": true,
            "priority": 5,
            "config": {"sql": {"query": "VACUUM", "connection_id": "c-1", "timing": {"post_sync": {}}}}
        }))
        .expect("deserialize");

        assert_eq!(hook.description, None);
        assert_eq!(
            hook.config,
            Some(JobHookAction::Sql(
                SqlHook::new("VACUUM", "c-1").with_timing(HookTiming::PostSync(Empty {}))
            ))
        );
    }

    #[test]
    fn test_timing_precedence() {
        let slots = HookTimingSlots {
            pre_sync: Some(Empty {}),
            post_sync: Some(Empty {}),
        };
        assert!(slots.ensure_single().is_err());
        assert_eq!(HookTiming::try_from(slots), Ok(HookTiming::PreSync(Empty {})));
    }
}

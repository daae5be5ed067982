//! Job hook converters.
//!
//! Encoding is strict: the hook needs an action, the SQL action needs a
//! connection and a timing. Decoding is lenient about an absent action: it
//! hydrates an empty SQL hook so callers can still display the hook.

use crate::convert::{FromWire, ToWire, require_connection_id};
use crate::error::{ConvertError, Result};
use crate::models::hook::{HookTiming, JobHook, JobHookAction, SqlHook};
use crate::optional::clamp_to_u32;
use crate::variant::Empty;
use crate::wire::hook as wire;

impl ToWire for JobHook {
    type Wire = wire::JobHook;

    fn to_wire(&self) -> Result<Self::Wire> {
        let action = self
            .config
            .as_ref()
            .ok_or_else(|| ConvertError::missing_variant(JobHookAction::GROUP))?;

        Ok(wire::JobHook {
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            priority: clamp_to_u32("priority", self.priority),
            config: Some(action.to_wire()?),
        })
    }
}

impl FromWire for JobHook {
    type Wire = wire::JobHook;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let config = match wire.config.as_ref() {
            Some(config) => JobHookAction::from_wire(config)?,
            None => {
                tracing::debug!(hook = %wire.name, "hook has no action; hydrating an empty sql hook");
                JobHookAction::Sql(SqlHook::default())
            }
        };

        Ok(Self {
            name: wire.name.clone(),
            description: wire.description.clone(),
            enabled: wire.enabled,
            priority: i64::from(wire.priority),
            config: Some(config),
        })
    }
}

impl ToWire for JobHookAction {
    type Wire = wire::JobHookConfig;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(variant = self.tag(), "encoding job hook config");
        match self {
            Self::Sql(hook) => Ok(wire::JobHookConfig::Sql(hook.to_wire()?)),
        }
    }
}

impl FromWire for JobHookAction {
    type Wire = wire::JobHookConfig;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        match wire {
            wire::JobHookConfig::Sql(hook) => Ok(Self::Sql(SqlHook::from_wire(hook)?)),
            wire::JobHookConfig::Unknown(tag) => Err(tag.unsupported()),
            wire::JobHookConfig::Malformed(payload) => Err(payload.invalid()),
        }
    }
}

impl ToWire for SqlHook {
    type Wire = wire::JobSqlHook;

    fn to_wire(&self) -> Result<Self::Wire> {
        let timing = match self.timing {
            Some(HookTiming::PreSync(_)) => wire::HookTiming::PreSync(Empty {}),
            Some(HookTiming::PostSync(_)) => wire::HookTiming::PostSync(Empty {}),
            None => return Err(ConvertError::missing_variant(HookTiming::GROUP)),
        };

        Ok(wire::JobSqlHook {
            query: self.query.clone(),
            connection_id: require_connection_id("sql hook", &self.connection_id)?,
            timing: Some(timing),
        })
    }
}

impl FromWire for SqlHook {
    type Wire = wire::JobSqlHook;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let timing = match wire.timing.as_ref() {
            Some(wire::HookTiming::PreSync(_)) => Some(HookTiming::PreSync(Empty {})),
            Some(wire::HookTiming::PostSync(_)) => Some(HookTiming::PostSync(Empty {})),
            Some(wire::HookTiming::Unknown(tag)) => return Err(tag.unsupported()),
            Some(wire::HookTiming::Malformed(payload)) => return Err(payload.invalid()),
            None => None,
        };

        Ok(Self {
            query: wire.query.clone(),
            connection_id: wire.connection_id.clone(),
            timing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sql_hook() -> JobHookAction {
        JobHookAction::Sql(
            SqlHook::new("TRUNCATE audit", "c-1").with_timing(HookTiming::PreSync(Empty {})),
        )
    }

    #[rstest]
    #[case(-10, 0)]
    #[case(0, 0)]
    #[case(250, 250)]
    #[case(i64::MAX, u32::MAX)]
    fn test_priority_clamp(#[case] priority: i64, #[case] expected: u32) {
        let hook = JobHook::new("h").with_action(sql_hook()).with_priority(priority);
        assert_eq!(hook.to_wire().map(|w| w.priority), Ok(expected));
    }

    #[test]
    fn test_missing_action_and_timing() {
        assert_eq!(
            JobHook::new("h").to_wire(),
            Err(ConvertError::missing_variant("job hook config"))
        );

        let hook = JobHook::new("h").with_action(JobHookAction::Sql(SqlHook::new("q", "c")));
        assert_eq!(
            hook.to_wire(),
            Err(ConvertError::missing_variant("hook timing"))
        );
    }

    #[test]
    fn test_sql_hook_needs_connection() {
        let hook = JobHook::new("h").with_action(JobHookAction::Sql(
            SqlHook::new("q", "").with_timing(HookTiming::PostSync(Empty {})),
        ));
        assert_eq!(
            hook.to_wire(),
            Err(ConvertError::missing_connection_reference("sql hook"))
        );
    }

    #[test]
    fn test_absent_wire_action_hydrates_empty_sql_hook() {
        let wire = wire::JobHook {
            name: "legacy".to_string(),
            enabled: true,
            priority: 3,
            ..Default::default()
        };
        let hook = JobHook::from_wire(&wire).expect("decode");
        assert_eq!(hook.config, Some(JobHookAction::Sql(SqlHook::default())));
        assert_eq!(hook.priority, 3);
    }

    #[test]
    fn test_round_trip() {
        let hook = JobHook {
            description: Some("clean up".to_string()),
            ..JobHook::new("cleanup").with_action(sql_hook()).with_priority(7)
        };
        let wire = hook.to_wire().expect("encode");
        assert_eq!(JobHook::from_wire(&wire), Ok(hook));
    }
}

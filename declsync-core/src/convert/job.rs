//! Job aggregate converters.

use crate::convert::{FromWire, ToWire, decode_optional, encode_optional};
use crate::error::{ConvertError, Result};
use crate::models::destination::JobDestination;
use crate::models::job::{
    ActivityOptions, Job, JobMapping, RetryPolicy, VirtualForeignKey,
    VirtualForeignKeyConstraint, WorkflowOptions,
};
use crate::models::source::JobSource;
use crate::models::transformer::TransformerConfig;
use crate::optional::{narrow_i64, widen_i32};
use crate::wire::job as wire;

impl ToWire for Job {
    type Wire = wire::Job;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(job = %self.name, "encoding job");
        Ok(wire::Job {
            job_name: self.name.clone(),
            cron_schedule: self.cron_schedule.clone(),
            source: Some(self.source.to_wire()?),
            destinations: self.destinations.to_wire()?,
            mappings: self.mappings.to_wire()?,
            virtual_foreign_keys: self.virtual_foreign_keys.to_wire()?,
            workflow_options: encode_optional(self.workflow_options.as_ref())?,
            sync_options: encode_optional(self.sync_options.as_ref())?,
        })
    }
}

impl FromWire for Job {
    type Wire = wire::Job;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let source = wire
            .source
            .as_ref()
            .ok_or_else(|| ConvertError::nil_input("job source"))?;

        Ok(Self {
            name: wire.job_name.clone(),
            cron_schedule: wire.cron_schedule.clone(),
            source: JobSource::from_wire(source)?,
            destinations: Vec::<JobDestination>::from_wire(&wire.destinations)?,
            mappings: Vec::<JobMapping>::from_wire(&wire.mappings)?,
            virtual_foreign_keys: Vec::<VirtualForeignKeyConstraint>::from_wire(
                &wire.virtual_foreign_keys,
            )?,
            workflow_options: decode_optional(wire.workflow_options.as_ref())?,
            sync_options: decode_optional(wire.sync_options.as_ref())?,
        })
    }
}

impl ToWire for JobMapping {
    type Wire = wire::JobMapping;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::JobMapping {
            schema: self.schema.clone(),
            table: self.table.clone(),
            column: self.column.clone(),
            transformer: Some(self.transformer.to_wire()?),
        })
    }
}

impl FromWire for JobMapping {
    type Wire = wire::JobMapping;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let transformer = wire.transformer.as_ref().ok_or_else(|| {
            ConvertError::nil_input(format!(
                "transformer for {}.{}.{}",
                wire.schema, wire.table, wire.column
            ))
        })?;

        Ok(Self {
            schema: wire.schema.clone(),
            table: wire.table.clone(),
            column: wire.column.clone(),
            transformer: TransformerConfig::from_wire(transformer)?,
        })
    }
}

impl ToWire for VirtualForeignKeyConstraint {
    type Wire = wire::VirtualForeignKeyConstraint;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::VirtualForeignKeyConstraint {
            schema: self.schema.clone(),
            table: self.table.clone(),
            columns: self.columns.clone(),
            foreign_key: Some(wire::VirtualForeignKey {
                schema: self.foreign_key.schema.clone(),
                table: self.foreign_key.table.clone(),
                columns: self.foreign_key.columns.clone(),
            }),
        })
    }
}

impl FromWire for VirtualForeignKeyConstraint {
    type Wire = wire::VirtualForeignKeyConstraint;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let foreign_key = wire.foreign_key.as_ref().ok_or_else(|| {
            ConvertError::nil_input(format!(
                "foreign key reference for {}.{}",
                wire.schema, wire.table
            ))
        })?;

        Ok(Self {
            schema: wire.schema.clone(),
            table: wire.table.clone(),
            columns: wire.columns.clone(),
            foreign_key: VirtualForeignKey {
                schema: foreign_key.schema.clone(),
                table: foreign_key.table.clone(),
                columns: foreign_key.columns.clone(),
            },
        })
    }
}

impl ToWire for WorkflowOptions {
    type Wire = wire::WorkflowOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::WorkflowOptions {
            run_timeout: self.run_timeout,
        })
    }
}

impl FromWire for WorkflowOptions {
    type Wire = wire::WorkflowOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            run_timeout: wire.run_timeout,
        })
    }
}

impl ToWire for ActivityOptions {
    type Wire = wire::ActivityOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::ActivityOptions {
            schedule_to_close_timeout: self.schedule_to_close_timeout,
            start_to_close_timeout: self.start_to_close_timeout,
            retry_policy: encode_optional(self.retry_policy.as_ref())?,
        })
    }
}

impl FromWire for ActivityOptions {
    type Wire = wire::ActivityOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            schedule_to_close_timeout: wire.schedule_to_close_timeout,
            start_to_close_timeout: wire.start_to_close_timeout,
            retry_policy: decode_optional(wire.retry_policy.as_ref())?,
        })
    }
}

impl ToWire for RetryPolicy {
    type Wire = wire::RetryPolicy;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::RetryPolicy {
            maximum_attempts: narrow_i64("maximum_attempts", self.maximum_attempts),
        })
    }
}

impl FromWire for RetryPolicy {
    type Wire = wire::RetryPolicy;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            maximum_attempts: widen_i32(wire.maximum_attempts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::source::PostgresSource;
    use crate::variant::Empty;
    use serde_json::json;

    #[test]
    fn test_absent_source_is_nil_input() {
        assert_eq!(
            Job::from_wire(&wire::Job::default()),
            Err(ConvertError::nil_input("job source"))
        );
    }

    #[test]
    fn test_mapping_without_transformer() {
        let wire: wire::JobMapping =
            serde_json::from_value(json!({"schema": "public", "table": "users", "column": "email"}))
                .expect("deserialize");
        assert_eq!(
            JobMapping::from_wire(&wire),
            Err(ConvertError::nil_input("transformer for public.users.email"))
        );
    }

    #[test]
    fn test_retry_attempts_clamp_to_absent() {
        let options = ActivityOptions {
            retry_policy: Some(RetryPolicy {
                maximum_attempts: Some(i64::from(i32::MAX) + 1),
            }),
            ..Default::default()
        };
        let wire = options.to_wire().expect("encode");
        assert_eq!(wire.retry_policy, Some(wire::RetryPolicy { maximum_attempts: None }));
    }

    #[test]
    fn test_source_error_propagates() {
        let job = Job::new("j", JobSource::Postgres(PostgresSource::new("")))
            .with_mapping(JobMapping::new("s", "t", "c", TransformerConfig::Null(Empty {})));
        assert_eq!(
            job.to_wire(),
            Err(ConvertError::missing_connection_reference("postgres source"))
        );
    }
}

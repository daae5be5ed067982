//! Job destination converters.

use crate::convert::{FromWire, ToWire, require_connection_id};
use crate::error::{ConvertError, Result};
use crate::models::destination::{
    DestinationOptions, JobDestination, MysqlDestinationOptions, MysqlTruncateTable,
    PostgresDestinationOptions, PostgresTruncateTable, Reserved,
};
use crate::variant::Empty;
use crate::wire::destination as wire;

/// Wire value of a reserved message field.
const fn reserved_absent<T>(reserved: Reserved) -> Option<T> {
    match reserved {
        Reserved::Unimplemented => None,
    }
}

/// Wire value of a reserved flag.
const fn reserved_flag(reserved: Reserved) -> bool {
    match reserved {
        Reserved::Unimplemented => false,
    }
}

fn warn_reserved(dialect: &str, populated: &[&'static str]) {
    if !populated.is_empty() {
        tracing::warn!(
            dialect,
            fields = ?populated,
            "reserved destination fields populated on the wire; ignoring them"
        );
    }
}

impl ToWire for JobDestination {
    type Wire = wire::JobDestination;

    fn to_wire(&self) -> Result<Self::Wire> {
        let context = format!("{} destination", self.options.tag());
        Ok(wire::JobDestination {
            connection_id: require_connection_id(&context, &self.connection_id)?,
            options: Some(self.options.to_wire()?),
        })
    }
}

impl FromWire for JobDestination {
    type Wire = wire::JobDestination;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let options = wire
            .options
            .as_ref()
            .ok_or_else(|| ConvertError::missing_variant(DestinationOptions::GROUP))?;
        Ok(Self {
            connection_id: wire.connection_id.clone(),
            options: DestinationOptions::from_wire(options)?,
        })
    }
}

impl ToWire for DestinationOptions {
    type Wire = wire::JobDestinationOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(variant = self.tag(), "encoding destination options");
        Ok(match self {
            Self::Postgres(options) => wire::JobDestinationOptions::PostgresOptions(
                wire::PostgresDestinationOptions {
                    truncate_table: options.truncate_table.map(|truncate| {
                        wire::PostgresTruncateTableConfig {
                            truncate_before_insert: truncate.truncate_before_insert,
                            cascade: truncate.cascade,
                        }
                    }),
                    init_table_schema: options.init_table_schema,
                    on_conflict: reserved_absent(options.on_conflict),
                    skip_foreign_key_violations: reserved_flag(options.skip_foreign_key_violations),
                    batch: reserved_absent(options.batch),
                    max_in_flight: reserved_absent(options.max_in_flight),
                },
            ),
            Self::Mysql(options) => {
                wire::JobDestinationOptions::MysqlOptions(wire::MysqlDestinationOptions {
                    truncate_table: options.truncate_table.map(|truncate| {
                        wire::MysqlTruncateTableConfig {
                            truncate_before_insert: truncate.truncate_before_insert,
                        }
                    }),
                    init_table_schema: options.init_table_schema,
                    on_conflict: reserved_absent(options.on_conflict),
                    skip_foreign_key_violations: reserved_flag(options.skip_foreign_key_violations),
                    batch: reserved_absent(options.batch),
                    max_in_flight: reserved_absent(options.max_in_flight),
                })
            }
            Self::ObjectStore(_) => wire::JobDestinationOptions::AwsS3Options(Empty {}),
        })
    }
}

impl FromWire for DestinationOptions {
    type Wire = wire::JobDestinationOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        match wire {
            wire::JobDestinationOptions::PostgresOptions(options) => {
                warn_reserved("postgres", &options.populated_reserved());
                Ok(Self::Postgres(PostgresDestinationOptions {
                    truncate_table: options.truncate_table.map(|truncate| PostgresTruncateTable {
                        truncate_before_insert: truncate.truncate_before_insert,
                        cascade: truncate.cascade,
                    }),
                    init_table_schema: options.init_table_schema,
                    ..Default::default()
                }))
            }
            wire::JobDestinationOptions::MysqlOptions(options) => {
                warn_reserved("mysql", &options.populated_reserved());
                Ok(Self::Mysql(MysqlDestinationOptions {
                    truncate_table: options.truncate_table.map(|truncate| MysqlTruncateTable {
                        truncate_before_insert: truncate.truncate_before_insert,
                    }),
                    init_table_schema: options.init_table_schema,
                    ..Default::default()
                }))
            }
            wire::JobDestinationOptions::AwsS3Options(_) => Ok(Self::ObjectStore(Empty {})),
            wire::JobDestinationOptions::Unknown(tag) => Err(tag.unsupported()),
            wire::JobDestinationOptions::Malformed(payload) => Err(payload.invalid()),
        }
    }
}

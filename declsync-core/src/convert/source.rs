//! Job source converters.

use crate::convert::{FromWire, ToWire, require_connection_id};
use crate::error::{ConvertError, Result};
use crate::models::source::{
    ColumnRemovalStrategy, GenerateSchema, GenerateSource, GenerateTable, JobSource, MysqlSource,
    NewColumnAdditionStrategy, ObjectStoreSource, PostgresSource, SchemaFilter, TableFilter,
};
use crate::optional::from_implicit;
use crate::variant::Empty;
use crate::wire::source as wire;

impl ToWire for JobSource {
    type Wire = wire::JobSource;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(variant = self.tag(), "encoding job source");
        let options = match self {
            Self::Postgres(source) => wire::JobSourceOptions::Postgres(source.to_wire()?),
            Self::Mysql(source) => wire::JobSourceOptions::Mysql(source.to_wire()?),
            Self::Generate(source) => wire::JobSourceOptions::Generate(source.to_wire()?),
            Self::ObjectStore(source) => wire::JobSourceOptions::AwsS3(source.to_wire()?),
        };
        Ok(wire::JobSource {
            options: Some(options),
        })
    }
}

impl FromWire for JobSource {
    type Wire = wire::JobSource;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        match wire.options.as_ref() {
            Some(wire::JobSourceOptions::Postgres(options)) => {
                Ok(Self::Postgres(PostgresSource::from_wire(options)?))
            }
            Some(wire::JobSourceOptions::Mysql(options)) => {
                Ok(Self::Mysql(MysqlSource::from_wire(options)?))
            }
            Some(wire::JobSourceOptions::Generate(options)) => {
                Ok(Self::Generate(GenerateSource::from_wire(options)?))
            }
            Some(wire::JobSourceOptions::AwsS3(options)) => {
                Ok(Self::ObjectStore(ObjectStoreSource::from_wire(options)?))
            }
            Some(wire::JobSourceOptions::Unknown(tag)) => Err(tag.unsupported()),
            Some(wire::JobSourceOptions::Malformed(payload)) => Err(payload.invalid()),
            None => Err(ConvertError::missing_variant(Self::GROUP)),
        }
    }
}

impl ToWire for PostgresSource {
    type Wire = wire::PostgresSourceOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        let connection_id = require_connection_id("postgres source", &self.connection_id)?;

        let new_column_addition_strategy = match &self.new_column_addition_strategy {
            Some(strategy) => Some(strategy.into()),
            None if self.subset_by_foreign_key_constraints => {
                tracing::debug!(
                    "no new column addition strategy; legacy subset flag selects halt_job"
                );
                Some(wire::PostgresNewColumnAdditionStrategy::HaltJob(Empty {}))
            }
            None => None,
        };

        Ok(wire::PostgresSourceOptions {
            connection_id,
            schemas: schemas_to_wire(&self.schemas),
            subset_by_foreign_key_constraints: self.subset_by_foreign_key_constraints,
            new_column_addition_strategy,
            column_removal_strategy: self.column_removal_strategy.as_ref().map(Into::into),
        })
    }
}

impl FromWire for PostgresSource {
    type Wire = wire::PostgresSourceOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            connection_id: wire.connection_id.clone(),
            schemas: schemas_from_wire(&wire.schemas),
            subset_by_foreign_key_constraints: wire.subset_by_foreign_key_constraints,
            new_column_addition_strategy: wire
                .new_column_addition_strategy
                .as_ref()
                .map(NewColumnAdditionStrategy::try_from)
                .transpose()?,
            column_removal_strategy: wire
                .column_removal_strategy
                .as_ref()
                .map(ColumnRemovalStrategy::try_from)
                .transpose()?,
        })
    }
}

impl ToWire for MysqlSource {
    type Wire = wire::MysqlSourceOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::MysqlSourceOptions {
            connection_id: require_connection_id("mysql source", &self.connection_id)?,
            schemas: schemas_to_wire(&self.schemas),
            subset_by_foreign_key_constraints: self.subset_by_foreign_key_constraints,
            column_removal_strategy: self.column_removal_strategy.as_ref().map(Into::into),
        })
    }
}

impl FromWire for MysqlSource {
    type Wire = wire::MysqlSourceOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            connection_id: wire.connection_id.clone(),
            schemas: schemas_from_wire(&wire.schemas),
            subset_by_foreign_key_constraints: wire.subset_by_foreign_key_constraints,
            column_removal_strategy: wire
                .column_removal_strategy
                .as_ref()
                .map(ColumnRemovalStrategy::try_from)
                .transpose()?,
        })
    }
}

impl ToWire for GenerateSource {
    type Wire = wire::GenerateSourceOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        let fk_source_connection_id = self
            .fk_source_connection_id
            .as_deref()
            .map(|id| require_connection_id("generate source foreign key source", id))
            .transpose()?;

        Ok(wire::GenerateSourceOptions {
            fk_source_connection_id,
            schemas: self
                .schemas
                .iter()
                .map(|schema| wire::GenerateSourceSchemaOption {
                    schema: schema.schema.clone(),
                    tables: schema
                        .tables
                        .iter()
                        .map(|table| wire::GenerateSourceTableOption {
                            table: table.table.clone(),
                            row_count: table.row_count,
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}

impl FromWire for GenerateSource {
    type Wire = wire::GenerateSourceOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            fk_source_connection_id: wire.fk_source_connection_id.clone().and_then(from_implicit),
            schemas: wire
                .schemas
                .iter()
                .map(|schema| GenerateSchema {
                    schema: schema.schema.clone(),
                    tables: schema
                        .tables
                        .iter()
                        .map(|table| GenerateTable {
                            table: table.table.clone(),
                            row_count: table.row_count,
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}

impl ToWire for ObjectStoreSource {
    type Wire = wire::AwsS3SourceOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::AwsS3SourceOptions {
            connection_id: require_connection_id("object store source", &self.connection_id)?,
        })
    }
}

impl FromWire for ObjectStoreSource {
    type Wire = wire::AwsS3SourceOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            connection_id: wire.connection_id.clone(),
        })
    }
}

fn schemas_to_wire(schemas: &[SchemaFilter]) -> Vec<wire::SourceSchemaOption> {
    schemas
        .iter()
        .map(|schema| wire::SourceSchemaOption {
            schema: schema.schema.clone(),
            tables: schema
                .tables
                .iter()
                .map(|table| wire::SourceTableOption {
                    table: table.table.clone(),
                    where_clause: table.where_clause.clone(),
                })
                .collect(),
        })
        .collect()
}

fn schemas_from_wire(schemas: &[wire::SourceSchemaOption]) -> Vec<SchemaFilter> {
    schemas
        .iter()
        .map(|schema| SchemaFilter {
            schema: schema.schema.clone(),
            tables: schema
                .tables
                .iter()
                .map(|table| TableFilter {
                    table: table.table.clone(),
                    where_clause: table.where_clause.clone(),
                })
                .collect(),
        })
        .collect()
}

impl From<&NewColumnAdditionStrategy> for wire::PostgresNewColumnAdditionStrategy {
    fn from(strategy: &NewColumnAdditionStrategy) -> Self {
        match strategy {
            NewColumnAdditionStrategy::HaltJob(_) => Self::HaltJob(Empty {}),
            NewColumnAdditionStrategy::AutoMap(_) => Self::AutoMap(Empty {}),
        }
    }
}

impl TryFrom<&wire::PostgresNewColumnAdditionStrategy> for NewColumnAdditionStrategy {
    type Error = ConvertError;

    fn try_from(strategy: &wire::PostgresNewColumnAdditionStrategy) -> Result<Self> {
        match strategy {
            wire::PostgresNewColumnAdditionStrategy::HaltJob(_) => Ok(Self::HaltJob(Empty {})),
            wire::PostgresNewColumnAdditionStrategy::AutoMap(_) => Ok(Self::AutoMap(Empty {})),
            wire::PostgresNewColumnAdditionStrategy::Unknown(tag) => Err(tag.unsupported()),
            wire::PostgresNewColumnAdditionStrategy::Malformed(payload) => Err(payload.invalid()),
        }
    }
}

impl From<&ColumnRemovalStrategy> for wire::PostgresColumnRemovalStrategy {
    fn from(strategy: &ColumnRemovalStrategy) -> Self {
        match strategy {
            ColumnRemovalStrategy::HaltJob(_) => Self::HaltJob(Empty {}),
            ColumnRemovalStrategy::ContinueJob(_) => Self::ContinueJob(Empty {}),
        }
    }
}

impl TryFrom<&wire::PostgresColumnRemovalStrategy> for ColumnRemovalStrategy {
    type Error = ConvertError;

    fn try_from(strategy: &wire::PostgresColumnRemovalStrategy) -> Result<Self> {
        match strategy {
            wire::PostgresColumnRemovalStrategy::HaltJob(_) => Ok(Self::HaltJob(Empty {})),
            wire::PostgresColumnRemovalStrategy::ContinueJob(_) => Ok(Self::ContinueJob(Empty {})),
            wire::PostgresColumnRemovalStrategy::Unknown(tag) => Err(tag.unsupported()),
            wire::PostgresColumnRemovalStrategy::Malformed(payload) => Err(payload.invalid()),
        }
    }
}

impl From<&ColumnRemovalStrategy> for wire::MysqlColumnRemovalStrategy {
    fn from(strategy: &ColumnRemovalStrategy) -> Self {
        match strategy {
            ColumnRemovalStrategy::HaltJob(_) => Self::HaltJob(Empty {}),
            ColumnRemovalStrategy::ContinueJob(_) => Self::ContinueJob(Empty {}),
        }
    }
}

impl TryFrom<&wire::MysqlColumnRemovalStrategy> for ColumnRemovalStrategy {
    type Error = ConvertError;

    fn try_from(strategy: &wire::MysqlColumnRemovalStrategy) -> Result<Self> {
        match strategy {
            wire::MysqlColumnRemovalStrategy::HaltJob(_) => Ok(Self::HaltJob(Empty {})),
            wire::MysqlColumnRemovalStrategy::ContinueJob(_) => Ok(Self::ContinueJob(Empty {})),
            wire::MysqlColumnRemovalStrategy::Unknown(tag) => Err(tag.unsupported()),
            wire::MysqlColumnRemovalStrategy::Malformed(payload) => Err(payload.invalid()),
        }
    }
}

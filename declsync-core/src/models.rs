//! Declarative configuration model.
//!
//! These are the value trees a front-end produces and the decode direction
//! hands back. Variant groups are real enums; their serde form is slot form
//! (see [`crate::variant`]).

pub mod connection;
pub mod destination;
pub mod hook;
pub mod job;
pub mod source;
pub mod transformer;

pub use connection::{
    ConnectionConfig, ConnectionConfigSlots, DatabaseEndpoint, Dialect, FieldForm,
    MysqlConnection, MysqlOptions, ObjectStoreConnection, ObjectStoreCredentials,
    PostgresConnection, PostgresOptions, SqlConnection, SqlConnectionOptions, SshTunnel,
    TunnelAuth,
};
pub use destination::{
    DestinationOptions, JobDestination, MysqlDestinationOptions, MysqlTruncateTable,
    PostgresDestinationOptions, PostgresTruncateTable, Reserved,
};
pub use hook::{HookTiming, JobHook, JobHookAction, SqlHook};
pub use job::{
    ActivityOptions, Job, JobMapping, RetryPolicy, VirtualForeignKey,
    VirtualForeignKeyConstraint, WorkflowOptions,
};
pub use source::{
    ColumnRemovalStrategy, GenerateSchema, GenerateSource, GenerateTable, JobSource,
    MysqlSource, NewColumnAdditionStrategy, ObjectStoreSource, PostgresSource, SchemaFilter,
    TableFilter,
};
pub use transformer::{EmailType, InvalidEmailAction, TransformerConfig};

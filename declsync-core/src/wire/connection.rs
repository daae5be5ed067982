//! Connection messages.

use crate::security::Secret;
use crate::variant::wire_oneof;
use serde::{Deserialize, Serialize};

/// Connection configuration message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConnectionConfigKind>,
}

wire_oneof! {
    /// Connection kind oneof.
    pub enum ConnectionConfigKind {
        PgConfig(PostgresConnectionConfig) = "pg_config",
        MysqlConfig(MysqlConnectionConfig) = "mysql_config",
        AwsS3Config(AwsS3ConnectionConfig) = "aws_s3_config",
    }
}

/// Postgres connection message.
pub type PostgresConnectionConfig = SqlConnectionConfig<PostgresConnection>;
/// MySQL connection message.
pub type MysqlConnectionConfig = SqlConnectionConfig<MysqlConnection>;

/// Body shared by the Postgres and MySQL connection messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "C: serde::de::DeserializeOwned"))]
pub struct SqlConnectionConfig<C> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_config: Option<SqlEndpoint<C>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<SshTunnel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_options: Option<SqlConnectionOptions>,
}

impl<C> Default for SqlConnectionConfig<C> {
    fn default() -> Self {
        Self {
            connection_config: None,
            tunnel: None,
            connection_options: None,
        }
    }
}

wire_oneof! {
    /// Endpoint oneof: `url` or `connection`.
    pub enum SqlEndpoint<C> {
        Url(String) = "url",
        Connection(C) = "connection",
    }
}

/// Discrete Postgres endpoint fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConnection {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    pub name: String,
    pub user: String,
    pub pass: Secret,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_mode: Option<String>,
}

/// Discrete MySQL endpoint fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlConnection {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    pub name: String,
    pub user: String,
    pub pass: Secret,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Connection pool limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConnectionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connection_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_connections: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_open_duration: Option<String>,
}

/// SSH tunnel in front of the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshTunnel {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_host_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<SshAuthentication>,
}

/// Wrapper holding the tunnel authentication oneof.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshAuthentication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<SshAuthKind>,
}

wire_oneof! {
    /// Tunnel authentication oneof.
    pub enum SshAuthKind {
        Passphrase(SshPassphrase) = "passphrase",
        PrivateKey(SshPrivateKey) = "private_key",
    }
}

/// Password authentication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshPassphrase {
    pub value: Secret,
}

/// Private key authentication, optionally encrypted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshPrivateKey {
    pub value: Secret,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<Secret>,
}

/// Object-store connection message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsS3ConnectionConfig {
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<AwsS3Credentials>,
}

/// Object-store credentials; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsS3Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<Secret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<Secret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_ec2_role: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_external_id: Option<String>,
}

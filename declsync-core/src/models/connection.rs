//! Connection configuration.
//!
//! Postgres and MySQL share one generic [`SqlConnection`] shape, told apart
//! by their [`Dialect`] options. Object storage has its own struct.
//!
//! # Security
//! Passwords, private keys, passphrases and cloud secrets are held in
//! [`Secret`] and never appear in debug output.

use crate::error::{ConvertError, Result};
use crate::optional::non_empty;
use crate::security::{Secret, exposed_non_empty};
use crate::variant::variant_group;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Dialect-specific options carried by a field-form endpoint.
pub trait Dialect: Clone + Default + PartialEq + fmt::Debug {
    /// Dialect name used in error messages and logs.
    const NAME: &'static str;
}

/// Postgres-only endpoint options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostgresOptions {
    /// libpq `sslmode` (disable, require, verify-full, ...)
    pub ssl_mode: Option<String>,
}

impl Dialect for PostgresOptions {
    const NAME: &'static str = "postgres";
}

/// MySQL-only endpoint options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MysqlOptions {
    /// Network protocol (tcp, unix)
    pub protocol: Option<String>,
}

impl Dialect for MysqlOptions {
    const NAME: &'static str = "mysql";
}

/// Postgres connection settings.
pub type PostgresConnection = SqlConnection<PostgresOptions>;

/// MySQL connection settings.
pub type MysqlConnection = SqlConnection<MysqlOptions>;

variant_group! {
    /// Connection settings for one of the supported stores.
    pub enum ConnectionConfig / ConnectionConfigSlots as "connection config" {
        /// Postgres database
        Postgres(PostgresConnection) => postgres,
        /// MySQL database
        Mysql(MysqlConnection) => mysql,
        /// S3-compatible object storage
        ObjectStore(ObjectStoreConnection) => aws_s3,
    }
}

/// A SQL database connection: endpoint, optional tunnel and pool options.
///
/// # Example
/// ```rust
/// use declsync_core::models::{ConnectionConfig, FieldForm, PostgresConnection};
///
/// let config = ConnectionConfig::Postgres(PostgresConnection::fields(FieldForm::new(
///     "db.internal",
///     5432,
///     "app",
///     "svc",
///     "secret",
/// )));
/// assert_eq!(config.tag(), "postgres");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SqlConnection<D> {
    /// URL form or field form
    pub endpoint: DatabaseEndpoint<D>,
    /// Optional SSH tunnel to reach the database through
    pub tunnel: Option<SshTunnel>,
    /// Optional connection pool limits
    pub connection_options: Option<SqlConnectionOptions>,
}

impl<D: Dialect> SqlConnection<D> {
    /// Creates a URL-form connection.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            endpoint: DatabaseEndpoint::Url(url.into()),
            tunnel: None,
            connection_options: None,
        }
    }

    /// Creates a field-form connection.
    pub fn fields(fields: FieldForm<D>) -> Self {
        Self {
            endpoint: DatabaseEndpoint::Fields(fields),
            tunnel: None,
            connection_options: None,
        }
    }

    /// Builder method to attach an SSH tunnel.
    pub fn with_tunnel(mut self, tunnel: SshTunnel) -> Self {
        self.tunnel = Some(tunnel);
        self
    }

    /// Builder method to set pool options.
    pub fn with_connection_options(mut self, options: SqlConnectionOptions) -> Self {
        self.connection_options = Some(options);
        self
    }
}

/// The two mutually exclusive ways of addressing a database.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseEndpoint<D> {
    /// A single connection string
    Url(String),
    /// Discrete host/port/name/user/pass fields
    Fields(FieldForm<D>),
}

/// Field-form endpoint. Every field is optional here; completeness is
/// checked when encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldForm<D> {
    pub host: Option<String>,
    /// 64-bit here, 32-bit on the wire
    pub port: Option<i64>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub pass: Option<Secret>,
    #[serde(flatten)]
    pub options: D,
}

/// Borrowed view of a field form that passed the completeness check.
#[derive(Debug)]
pub(crate) struct CompleteFields<'a> {
    pub host: &'a str,
    pub port: i64,
    pub name: &'a str,
    pub user: &'a str,
    pub pass: &'a str,
}

impl<D: Dialect> FieldForm<D> {
    /// Creates a fully populated field form with default dialect options.
    pub fn new(
        host: impl Into<String>,
        port: i64,
        name: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            name: Some(name.into()),
            user: Some(user.into()),
            pass: Some(Secret::new(pass)),
            options: D::default(),
        }
    }

    /// Builder method to set dialect options.
    pub fn with_options(mut self, options: D) -> Self {
        self.options = options;
        self
    }

    /// Names of the required fields that are absent, empty or zero.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.as_deref().and_then(non_empty).is_none() {
            missing.push("host");
        }
        if self.port.is_none_or(|port| port == 0) {
            missing.push("port");
        }
        if self.name.as_deref().and_then(non_empty).is_none() {
            missing.push("name");
        }
        if self.user.as_deref().and_then(non_empty).is_none() {
            missing.push("user");
        }
        if exposed_non_empty(self.pass.as_ref()).is_none() {
            missing.push("pass");
        }
        missing
    }

    /// Checks that host, port≠0, name, user and pass are all present.
    pub(crate) fn require_complete(&self) -> Result<CompleteFields<'_>> {
        match (
            self.host.as_deref().and_then(non_empty),
            self.port.filter(|port| *port != 0),
            self.name.as_deref().and_then(non_empty),
            self.user.as_deref().and_then(non_empty),
            exposed_non_empty(self.pass.as_ref()),
        ) {
            (Some(host), Some(port), Some(name), Some(user), Some(pass)) => Ok(CompleteFields {
                host,
                port,
                name,
                user,
                pass,
            }),
            _ => {
                tracing::debug!(
                    dialect = D::NAME,
                    missing = ?self.missing_fields(),
                    "field-form endpoint is incomplete"
                );
                Err(ConvertError::incomplete_field_form(D::NAME))
            }
        }
    }
}

/// Slot form of [`SqlConnection`] as produced by front-ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlConnectionSlots<D> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<FieldForm<D>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<SshTunnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_options: Option<SqlConnectionOptions>,
}

impl<D: Dialect> TryFrom<SqlConnectionSlots<D>> for SqlConnection<D> {
    type Error = ConvertError;

    /// A non-empty `url` selects URL form; otherwise a present `connection`
    /// block selects field form.
    fn try_from(slots: SqlConnectionSlots<D>) -> Result<Self> {
        let endpoint = match (slots.url, slots.connection) {
            (Some(url), connection) if !url.is_empty() => {
                if connection.is_some() {
                    tracing::warn!(
                        dialect = D::NAME,
                        "both url and field-form populated; using url"
                    );
                }
                DatabaseEndpoint::Url(url)
            }
            (_, Some(fields)) => DatabaseEndpoint::Fields(fields),
            (_, None) => return Err(ConvertError::incomplete_field_form(D::NAME)),
        };

        Ok(Self {
            endpoint,
            tunnel: slots.tunnel,
            connection_options: slots.connection_options,
        })
    }
}

impl<D> From<SqlConnection<D>> for SqlConnectionSlots<D> {
    fn from(connection: SqlConnection<D>) -> Self {
        let (url, fields) = match connection.endpoint {
            DatabaseEndpoint::Url(url) => (Some(url), None),
            DatabaseEndpoint::Fields(fields) => (None, Some(fields)),
        };
        Self {
            url,
            connection: fields,
            tunnel: connection.tunnel,
            connection_options: connection.connection_options,
        }
    }
}

impl<D: Dialect + Serialize> Serialize for SqlConnection<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SqlConnectionSlots::from(self.clone()).serialize(serializer)
    }
}

impl<'de, D: Dialect + Deserialize<'de>> Deserialize<'de> for SqlConnection<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> std::result::Result<Self, De::Error> {
        let slots = SqlConnectionSlots::<D>::deserialize(deserializer)?;
        Self::try_from(slots).map_err(serde::de::Error::custom)
    }
}

/// Connection pool limits for SQL connections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlConnectionOptions {
    /// Narrowed to 32 bits on the wire
    pub max_connection_limit: Option<i64>,
    /// Narrowed to 32 bits on the wire
    pub max_idle_connections: Option<i64>,
    /// Duration string, e.g. "5m"
    pub max_idle_duration: Option<String>,
    /// Duration string, e.g. "1h"
    pub max_open_duration: Option<String>,
}

/// SSH bastion used to reach a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SshTunnelSlots", into = "SshTunnelSlots")]
pub struct SshTunnel {
    pub host: String,
    /// 64-bit here, 32-bit on the wire
    pub port: i64,
    pub user: String,
    pub known_host_public_key: Option<String>,
    pub auth: TunnelAuth,
}

/// How the tunnel authenticates.
#[derive(Debug, Clone, PartialEq)]
pub enum TunnelAuth {
    /// Key-based auth with an optional key passphrase
    PrivateKey {
        value: Secret,
        passphrase: Option<Secret>,
    },
    /// Password auth
    Passphrase { value: Secret },
    /// No authentication material
    None,
}

impl TunnelAuth {
    /// Applies the selection rule: a non-empty private key wins and keeps the
    /// passphrase as its companion; else a non-empty passphrase; else `None`.
    pub fn select(private_key: Option<Secret>, passphrase: Option<Secret>) -> Self {
        match (private_key, passphrase) {
            (Some(key), passphrase) if !key.is_empty() => Self::PrivateKey {
                value: key,
                passphrase,
            },
            (_, Some(passphrase)) if !passphrase.is_empty() => Self::Passphrase { value: passphrase },
            _ => Self::None,
        }
    }
}

/// Slot form of [`SshTunnel`]: credentials as two independent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshTunnelSlots {
    pub host: String,
    pub port: i64,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_host_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<Secret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<Secret>,
}

impl From<SshTunnelSlots> for SshTunnel {
    fn from(slots: SshTunnelSlots) -> Self {
        Self {
            auth: TunnelAuth::select(slots.private_key, slots.passphrase),
            host: slots.host,
            port: slots.port,
            user: slots.user,
            known_host_public_key: slots.known_host_public_key,
        }
    }
}

impl From<SshTunnel> for SshTunnelSlots {
    fn from(tunnel: SshTunnel) -> Self {
        let (private_key, passphrase) = match tunnel.auth {
            TunnelAuth::PrivateKey { value, passphrase } => (Some(value), passphrase),
            TunnelAuth::Passphrase { value } => (None, Some(value)),
            TunnelAuth::None => (None, None),
        };
        Self {
            host: tunnel.host,
            port: tunnel.port,
            user: tunnel.user,
            known_host_public_key: tunnel.known_host_public_key,
            private_key,
            passphrase,
        }
    }
}

/// S3-compatible object storage location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreConnection {
    /// Required bucket name
    pub bucket: String,
    pub path_prefix: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub credentials: Option<ObjectStoreCredentials>,
}

impl ObjectStoreConnection {
    /// Creates a connection to `bucket` with everything else unset.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }
}

/// Object-store credentials. A block with all seven fields absent counts
/// as no block at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreCredentials {
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<Secret>,
    pub session_token: Option<Secret>,
    pub from_ec2_role: Option<bool>,
    pub role_arn: Option<String>,
    pub role_external_id: Option<String>,
}

impl ObjectStoreCredentials {
    /// True when all seven fields are absent.
    pub const fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.access_key_id.is_none()
            && self.secret_access_key.is_none()
            && self.session_token.is_none()
            && self.from_ec2_role.is_none()
            && self.role_arn.is_none()
            && self.role_external_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tunnel_auth_selection_rule() {
        let key = || Some(Secret::new("-----BEGIN KEY-----"));
        let pass = || Some(Secret::new("hunter2"));

        assert!(matches!(
            TunnelAuth::select(key(), pass()),
            TunnelAuth::PrivateKey { passphrase: Some(_), .. }
        ));
        assert!(matches!(
            TunnelAuth::select(Some(Secret::default()), pass()),
            TunnelAuth::Passphrase { .. }
        ));
        assert_eq!(TunnelAuth::select(None, Some(Secret::default())), TunnelAuth::None);
        assert_eq!(TunnelAuth::select(None, None), TunnelAuth::None);
    }

    #[test]
    fn test_missing_fields() {
        let fields = FieldForm::<PostgresOptions> {
            host: Some(String::new()),
            port: Some(0),
            name: Some("app".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.missing_fields(), vec!["host", "port", "user", "pass"]);
        assert!(fields.require_complete().is_err());

        let fields = FieldForm::<MysqlOptions>::new("h", 3306, "n", "u", "p");
        assert!(fields.missing_fields().is_empty());
        assert_eq!(fields.require_complete().map(|c| c.port).ok(), Some(3306));
    }

    #[test]
    fn test_slot_form_url_wins_over_fields() {
        let connection: PostgresConnection = serde_json::from_value(json!({
            "url": "postgres://x",
            "connection": {"host": "h", "port": 1, "name": "n", "user": "u", "pass": "p"}
        }))
        .expect("deserialize");
        assert_eq!(connection.endpoint, DatabaseEndpoint::Url("postgres://x".to_string()));
    }

    #[test]
    fn test_slot_form_empty_url_falls_back_to_fields() {
        let connection: MysqlConnection = serde_json::from_value(json!({
            "url": "",
            "connection": {"host": "h", "port": 3306, "name": "n", "user": "u", "pass": "p", "protocol": "tcp"}
        }))
        .expect("deserialize");
        let DatabaseEndpoint::Fields(fields) = connection.endpoint else {
            panic!("expected field form");
        };
        assert_eq!(fields.options.protocol.as_deref(), Some("tcp"));
    }

    #[test]
    fn test_slot_form_without_endpoint_is_incomplete() {
        let slots = SqlConnectionSlots::<PostgresOptions>::default();
        assert_eq!(
            PostgresConnection::try_from(slots),
            Err(ConvertError::incomplete_field_form("postgres"))
        );
    }

    #[test]
    fn test_tunnel_slot_form() {
        let tunnel: SshTunnel = serde_json::from_value(json!({
            "host": "bastion",
            "port": 22,
            "user": "jump",
            "passphrase": "pw"
        }))
        .expect("deserialize");
        assert_eq!(
            tunnel.auth,
            TunnelAuth::Passphrase {
                value: Secret::new("pw")
            }
        );

        let value = serde_json::to_value(&tunnel).expect("serialize");
        assert_eq!(value["passphrase"], "pw");
        assert!(value.get("private_key").is_none());
    }

    #[test]
    fn test_credentials_emptiness() {
        assert!(ObjectStoreCredentials::default().is_empty());
        let credentials = ObjectStoreCredentials {
            from_ec2_role: Some(false),
            ..Default::default()
        };
        assert!(!credentials.is_empty());
    }

    #[test]
    fn test_connection_debug_hides_password() {
        let config = ConnectionConfig::Postgres(PostgresConnection::fields(FieldForm::new(
            "h", 5432, "n", "u", "supersecret",
        )));
        assert!(!format!("{:?}", config).contains("supersecret"));
    }
}

//! Connection converters.

use crate::convert::{FromWire, ToWire, decode_optional, encode_optional};
use crate::error::{ConvertError, Result};
use crate::models::connection::{
    ConnectionConfig, DatabaseEndpoint, Dialect, FieldForm, MysqlOptions, ObjectStoreConnection,
    ObjectStoreCredentials, PostgresOptions, SqlConnection, SqlConnectionOptions, SshTunnel,
    TunnelAuth,
};
use crate::optional::{from_implicit, narrow_i64, to_implicit, widen_i32};
use crate::security::{Secret, redact_url};
use crate::wire::connection as wire;

/// Ties a configuration dialect to its wire connection message.
pub trait WireDialect: Dialect {
    /// Field-form message for this dialect.
    type Connection;

    /// Encodes a field form, failing when a required field is missing.
    fn connection_to_wire(fields: &FieldForm<Self>) -> Result<Self::Connection>;

    /// Hydrates a field form.
    fn connection_from_wire(connection: &Self::Connection) -> FieldForm<Self>;
}

fn non_empty_secret(secret: &Secret) -> Option<Secret> {
    (!secret.is_empty()).then(|| secret.clone())
}

impl WireDialect for PostgresOptions {
    type Connection = wire::PostgresConnection;

    fn connection_to_wire(fields: &FieldForm<Self>) -> Result<Self::Connection> {
        let complete = fields.require_complete()?;
        Ok(wire::PostgresConnection {
            host: complete.host.to_string(),
            port: narrow_i64("postgres.port", Some(complete.port)),
            name: complete.name.to_string(),
            user: complete.user.to_string(),
            pass: Secret::new(complete.pass),
            ssl_mode: fields.options.ssl_mode.clone(),
        })
    }

    fn connection_from_wire(connection: &Self::Connection) -> FieldForm<Self> {
        FieldForm {
            host: from_implicit(connection.host.clone()),
            port: widen_i32(connection.port),
            name: from_implicit(connection.name.clone()),
            user: from_implicit(connection.user.clone()),
            pass: non_empty_secret(&connection.pass),
            options: Self {
                ssl_mode: connection.ssl_mode.clone(),
            },
        }
    }
}

impl WireDialect for MysqlOptions {
    type Connection = wire::MysqlConnection;

    fn connection_to_wire(fields: &FieldForm<Self>) -> Result<Self::Connection> {
        let complete = fields.require_complete()?;
        Ok(wire::MysqlConnection {
            host: complete.host.to_string(),
            port: narrow_i64("mysql.port", Some(complete.port)),
            name: complete.name.to_string(),
            user: complete.user.to_string(),
            pass: Secret::new(complete.pass),
            protocol: fields.options.protocol.clone(),
        })
    }

    fn connection_from_wire(connection: &Self::Connection) -> FieldForm<Self> {
        FieldForm {
            host: from_implicit(connection.host.clone()),
            port: widen_i32(connection.port),
            name: from_implicit(connection.name.clone()),
            user: from_implicit(connection.user.clone()),
            pass: non_empty_secret(&connection.pass),
            options: Self {
                protocol: connection.protocol.clone(),
            },
        }
    }
}

impl ToWire for ConnectionConfig {
    type Wire = wire::ConnectionConfig;

    fn to_wire(&self) -> Result<Self::Wire> {
        tracing::debug!(variant = self.tag(), "encoding connection config");
        let kind = match self {
            Self::Postgres(connection) => wire::ConnectionConfigKind::PgConfig(connection.to_wire()?),
            Self::Mysql(connection) => wire::ConnectionConfigKind::MysqlConfig(connection.to_wire()?),
            Self::ObjectStore(connection) => {
                wire::ConnectionConfigKind::AwsS3Config(connection.to_wire()?)
            }
        };
        Ok(wire::ConnectionConfig { config: Some(kind) })
    }
}

impl FromWire for ConnectionConfig {
    type Wire = wire::ConnectionConfig;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        match wire.config.as_ref() {
            Some(wire::ConnectionConfigKind::PgConfig(config)) => {
                Ok(Self::Postgres(SqlConnection::from_wire(config)?))
            }
            Some(wire::ConnectionConfigKind::MysqlConfig(config)) => {
                Ok(Self::Mysql(SqlConnection::from_wire(config)?))
            }
            Some(wire::ConnectionConfigKind::AwsS3Config(config)) => {
                Ok(Self::ObjectStore(ObjectStoreConnection::from_wire(config)?))
            }
            Some(wire::ConnectionConfigKind::Unknown(tag)) => Err(tag.unsupported()),
            Some(wire::ConnectionConfigKind::Malformed(payload)) => Err(payload.invalid()),
            None => Err(ConvertError::missing_variant(Self::GROUP)),
        }
    }
}

impl<D: WireDialect> ToWire for SqlConnection<D> {
    type Wire = wire::SqlConnectionConfig<D::Connection>;

    /// A non-empty URL wins; otherwise the field form must be complete.
    fn to_wire(&self) -> Result<Self::Wire> {
        let endpoint = match &self.endpoint {
            DatabaseEndpoint::Url(url) if !url.is_empty() => {
                tracing::debug!(dialect = D::NAME, url = %redact_url(url), "encoding url-form endpoint");
                wire::SqlEndpoint::Url(url.clone())
            }
            DatabaseEndpoint::Url(_) => return Err(ConvertError::incomplete_field_form(D::NAME)),
            DatabaseEndpoint::Fields(fields) => {
                wire::SqlEndpoint::Connection(D::connection_to_wire(fields)?)
            }
        };

        Ok(wire::SqlConnectionConfig {
            connection_config: Some(endpoint),
            tunnel: encode_optional(self.tunnel.as_ref())?,
            connection_options: encode_optional(self.connection_options.as_ref())?,
        })
    }
}

impl<D: WireDialect> FromWire for SqlConnection<D> {
    type Wire = wire::SqlConnectionConfig<D::Connection>;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let endpoint = match wire.connection_config.as_ref() {
            Some(wire::SqlEndpoint::Url(url)) => DatabaseEndpoint::Url(url.clone()),
            Some(wire::SqlEndpoint::Connection(connection)) => {
                DatabaseEndpoint::Fields(D::connection_from_wire(connection))
            }
            Some(wire::SqlEndpoint::Unknown(tag)) => return Err(tag.unsupported()),
            Some(wire::SqlEndpoint::Malformed(payload)) => return Err(payload.invalid()),
            None => {
                return Err(ConvertError::missing_variant(format!(
                    "{} connection endpoint",
                    D::NAME
                )));
            }
        };

        Ok(Self {
            endpoint,
            tunnel: decode_optional(wire.tunnel.as_ref())?,
            connection_options: decode_optional(wire.connection_options.as_ref())?,
        })
    }
}

impl ToWire for SqlConnectionOptions {
    type Wire = wire::SqlConnectionOptions;

    fn to_wire(&self) -> Result<Self::Wire> {
        Ok(wire::SqlConnectionOptions {
            max_connection_limit: narrow_i64("max_connection_limit", self.max_connection_limit),
            max_idle_connections: narrow_i64("max_idle_connections", self.max_idle_connections),
            max_idle_duration: self.max_idle_duration.clone(),
            max_open_duration: self.max_open_duration.clone(),
        })
    }
}

impl FromWire for SqlConnectionOptions {
    type Wire = wire::SqlConnectionOptions;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            max_connection_limit: widen_i32(wire.max_connection_limit),
            max_idle_connections: widen_i32(wire.max_idle_connections),
            max_idle_duration: wire.max_idle_duration.clone(),
            max_open_duration: wire.max_open_duration.clone(),
        })
    }
}

impl ToWire for SshTunnel {
    type Wire = wire::SshTunnel;

    fn to_wire(&self) -> Result<Self::Wire> {
        // Re-apply the selection rule so an empty key never reaches the wire.
        let (private_key, passphrase) = match &self.auth {
            TunnelAuth::PrivateKey { value, passphrase } => (Some(value.clone()), passphrase.clone()),
            TunnelAuth::Passphrase { value } => (None, Some(value.clone())),
            TunnelAuth::None => (None, None),
        };
        let auth_config = match TunnelAuth::select(private_key, passphrase) {
            TunnelAuth::PrivateKey { value, passphrase } => {
                Some(wire::SshAuthKind::PrivateKey(wire::SshPrivateKey { value, passphrase }))
            }
            TunnelAuth::Passphrase { value } => {
                Some(wire::SshAuthKind::Passphrase(wire::SshPassphrase { value }))
            }
            TunnelAuth::None => None,
        };

        Ok(wire::SshTunnel {
            host: self.host.clone(),
            port: narrow_i64("tunnel.port", Some(self.port)),
            user: self.user.clone(),
            known_host_public_key: self.known_host_public_key.clone(),
            authentication: auth_config.map(|auth_config| wire::SshAuthentication {
                auth_config: Some(auth_config),
            }),
        })
    }
}

impl FromWire for SshTunnel {
    type Wire = wire::SshTunnel;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        let auth = match wire
            .authentication
            .as_ref()
            .and_then(|authentication| authentication.auth_config.as_ref())
        {
            Some(wire::SshAuthKind::PrivateKey(key)) => TunnelAuth::PrivateKey {
                value: key.value.clone(),
                passphrase: key.passphrase.clone(),
            },
            Some(wire::SshAuthKind::Passphrase(passphrase)) => TunnelAuth::Passphrase {
                value: passphrase.value.clone(),
            },
            Some(wire::SshAuthKind::Unknown(tag)) => return Err(tag.unsupported()),
            Some(wire::SshAuthKind::Malformed(payload)) => return Err(payload.invalid()),
            None => TunnelAuth::None,
        };

        Ok(Self {
            host: wire.host.clone(),
            port: to_implicit(widen_i32(wire.port)),
            user: wire.user.clone(),
            known_host_public_key: wire.known_host_public_key.clone(),
            auth,
        })
    }
}

impl ToWire for ObjectStoreConnection {
    type Wire = wire::AwsS3ConnectionConfig;

    fn to_wire(&self) -> Result<Self::Wire> {
        if self.bucket.is_empty() {
            return Err(ConvertError::invalid_variant("object_store: bucket is required"));
        }

        Ok(wire::AwsS3ConnectionConfig {
            bucket: self.bucket.clone(),
            path_prefix: self.path_prefix.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            credentials: self
                .credentials
                .as_ref()
                .filter(|credentials| !credentials.is_empty())
                .map(credentials_to_wire),
        })
    }
}

impl FromWire for ObjectStoreConnection {
    type Wire = wire::AwsS3ConnectionConfig;

    fn from_wire(wire: &Self::Wire) -> Result<Self> {
        Ok(Self {
            bucket: wire.bucket.clone(),
            path_prefix: wire.path_prefix.clone(),
            region: wire.region.clone(),
            endpoint: wire.endpoint.clone(),
            credentials: wire
                .credentials
                .as_ref()
                .map(credentials_from_wire)
                .filter(|credentials| !credentials.is_empty()),
        })
    }
}

fn credentials_to_wire(credentials: &ObjectStoreCredentials) -> wire::AwsS3Credentials {
    wire::AwsS3Credentials {
        profile: credentials.profile.clone(),
        access_key_id: credentials.access_key_id.clone(),
        secret_access_key: credentials.secret_access_key.clone(),
        session_token: credentials.session_token.clone(),
        from_ec2_role: credentials.from_ec2_role,
        role_arn: credentials.role_arn.clone(),
        role_external_id: credentials.role_external_id.clone(),
    }
}

fn credentials_from_wire(credentials: &wire::AwsS3Credentials) -> ObjectStoreCredentials {
    ObjectStoreCredentials {
        profile: credentials.profile.clone(),
        access_key_id: credentials.access_key_id.clone(),
        secret_access_key: credentials.secret_access_key.clone(),
        session_token: credentials.session_token.clone(),
        from_ec2_role: credentials.from_ec2_role,
        role_arn: credentials.role_arn.clone(),
        role_external_id: credentials.role_external_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::connection::{MysqlConnection, PostgresConnection};
    use serde_json::json;

    fn tunnel(auth: TunnelAuth) -> SshTunnel {
        SshTunnel {
            host: "bastion".to_string(),
            port: 22,
            user: "jump".to_string(),
            known_host_public_key: None,
            auth,
        }
    }

    #[test]
    fn test_url_form_keeps_tunnel() {
        let config = ConnectionConfig::Postgres(
            PostgresConnection::url("postgres://x").with_tunnel(tunnel(TunnelAuth::None)),
        );
        let wire = config.to_wire().expect("encode");
        let value = serde_json::to_value(&wire).expect("serialize");
        assert_eq!(
            value["config"]["pg_config"]["connection_config"],
            json!({"url": "postgres://x"})
        );
        assert_eq!(value["config"]["pg_config"]["tunnel"]["host"], "bastion");
        assert!(value["config"]["pg_config"]["tunnel"].get("authentication").is_none());
        assert_eq!(ConnectionConfig::from_wire(&wire), Ok(config));
    }

    #[test]
    fn test_empty_url_is_incomplete() {
        let config = ConnectionConfig::Mysql(MysqlConnection::url(""));
        assert_eq!(
            config.to_wire(),
            Err(ConvertError::incomplete_field_form("mysql"))
        );
    }

    #[test]
    fn test_tunnel_private_key_wins() {
        let auth = TunnelAuth::PrivateKey {
            value: Secret::new("KEY"),
            passphrase: Some(Secret::new("pw")),
        };
        let wire = tunnel(auth.clone()).to_wire().expect("encode");
        assert!(matches!(
            wire.authentication.as_ref().and_then(|a| a.auth_config.as_ref()),
            Some(wire::SshAuthKind::PrivateKey(_))
        ));
        assert_eq!(SshTunnel::from_wire(&wire).map(|t| t.auth), Ok(auth));
    }

    #[test]
    fn test_tunnel_empty_key_falls_back_to_passphrase() {
        let auth = TunnelAuth::PrivateKey {
            value: Secret::default(),
            passphrase: Some(Secret::new("pw")),
        };
        let wire = tunnel(auth).to_wire().expect("encode");
        assert!(matches!(
            wire.authentication.as_ref().and_then(|a| a.auth_config.as_ref()),
            Some(wire::SshAuthKind::Passphrase(_))
        ));
    }

    #[test]
    fn test_tunnel_without_port_hydrates_zero() {
        let wire: wire::SshTunnel =
            serde_json::from_value(json!({"host": "b", "user": "u"})).expect("deserialize");
        let tunnel = SshTunnel::from_wire(&wire).expect("decode");
        assert_eq!(tunnel.port, 0);
        assert_eq!(tunnel.auth, TunnelAuth::None);
    }

    #[test]
    fn test_unknown_auth_tag() {
        let wire: wire::SshTunnel = serde_json::from_value(json!({
            "host": "b",
            "user": "u",
            "authentication": {"auth_config": {"certificate": {"value": "x"}}}
        }))
        .expect("deserialize");
        assert_eq!(
            SshTunnel::from_wire(&wire),
            Err(ConvertError::unsupported_variant("certificate"))
        );
    }

    #[test]
    fn test_bucket_is_required() {
        let config = ConnectionConfig::ObjectStore(ObjectStoreConnection::default());
        assert!(matches!(
            config.to_wire(),
            Err(ConvertError::InvalidVariantSelection(msg)) if msg.contains("bucket")
        ));
    }

    #[test]
    fn test_pool_options_narrowing() {
        let options = SqlConnectionOptions {
            max_connection_limit: Some(1 << 40),
            max_idle_connections: Some(4),
            ..Default::default()
        };
        let wire = options.to_wire().expect("encode");
        assert_eq!(wire.max_connection_limit, None);
        assert_eq!(wire.max_idle_connections, Some(4));
    }

    #[test]
    fn test_absent_config_is_missing_selection() {
        assert_eq!(
            ConnectionConfig::from_wire(&wire::ConnectionConfig::default()),
            Err(ConvertError::missing_variant("connection config"))
        );
    }
}

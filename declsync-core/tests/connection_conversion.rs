//! Connection conversion scenarios.

use declsync_core::convert::{FromWire, ToWire};
use declsync_core::models::{
    ConnectionConfig, ConnectionConfigSlots, DatabaseEndpoint, FieldForm, MysqlConnection,
    MysqlOptions, ObjectStoreConnection, ObjectStoreCredentials, PostgresConnection,
    PostgresOptions, SqlConnectionOptions, SshTunnel, TunnelAuth,
};
use declsync_core::security::Secret;
use declsync_core::wire::connection as wire;
use declsync_core::ConvertError;
use rstest::rstest;
use serde_json::json;

fn round_trip(config: &ConnectionConfig) -> ConnectionConfig {
    let wire = config.to_wire().expect("encode");
    let json = serde_json::to_value(&wire).expect("serialize wire");
    let wire: wire::ConnectionConfig = serde_json::from_value(json).expect("deserialize wire");
    ConnectionConfig::from_wire(&wire).expect("decode")
}

#[test]
fn test_url_form_postgres_scenario() {
    let config: ConnectionConfig =
        serde_json::from_value(json!({"postgres": {"url": "postgres://x"}})).expect("slot form");

    let wire = config.to_wire().expect("encode");
    assert_eq!(
        serde_json::to_value(&wire).expect("serialize"),
        json!({"config": {"pg_config": {"connection_config": {"url": "postgres://x"}}}})
    );

    let decoded = ConnectionConfig::from_wire(&wire).expect("decode");
    assert_eq!(decoded, config);
    assert_eq!(
        serde_json::to_value(&decoded).expect("serialize config"),
        json!({"postgres": {"url": "postgres://x"}})
    );
}

#[test]
fn test_incomplete_field_form_scenario() {
    let config: ConnectionConfig = serde_json::from_value(json!({
        "postgres": {"connection": {"host": "", "port": 0, "name": "app", "user": "svc", "pass": "pw"}}
    }))
    .expect("slot form");

    let err = config.to_wire().expect_err("must fail");
    assert_eq!(
        err,
        ConvertError::InvalidVariantSelection("postgres: incomplete field-form".to_string())
    );
}

#[test]
fn test_field_form_round_trip_with_tunnel_and_pool() {
    let config = ConnectionConfig::Mysql(
        MysqlConnection::fields(
            FieldForm::new("db.internal", 3306, "app", "svc", "pw").with_options(MysqlOptions {
                protocol: Some("tcp".to_string()),
            }),
        )
        .with_tunnel(SshTunnel {
            host: "bastion".to_string(),
            port: 2222,
            user: "jump".to_string(),
            known_host_public_key: Some("ssh-ed25519 AAAA".to_string()),
            auth: TunnelAuth::PrivateKey {
                value: Secret::new("-----BEGIN KEY-----"),
                passphrase: None,
            },
        })
        .with_connection_options(SqlConnectionOptions {
            max_connection_limit: Some(20),
            max_idle_connections: Some(5),
            max_idle_duration: Some("5m".to_string()),
            max_open_duration: None,
        }),
    );

    assert_eq!(round_trip(&config), config);
}

#[test]
fn test_port_narrowing_clamps_to_absent() {
    let config = ConnectionConfig::Postgres(PostgresConnection::fields(FieldForm::new(
        "h",
        1 << 31,
        "n",
        "u",
        "p",
    )));

    let wire = config.to_wire().expect("narrowing never fails");
    let Some(wire::ConnectionConfigKind::PgConfig(pg)) = wire.config else {
        panic!("expected pg_config");
    };
    let Some(wire::SqlEndpoint::Connection(connection)) = pg.connection_config else {
        panic!("expected field form");
    };
    assert_eq!(connection.port, None);
    assert_eq!(connection.host, "h");
}

#[rstest]
#[case(ObjectStoreCredentials::default(), false)]
#[case(ObjectStoreCredentials { profile: Some("dev".to_string()), ..Default::default() }, true)]
#[case(ObjectStoreCredentials { from_ec2_role: Some(true), ..Default::default() }, true)]
#[case(ObjectStoreCredentials { session_token: Some(Secret::new("t")), ..Default::default() }, true)]
fn test_credentials_emptiness_on_decode(
    #[case] credentials: ObjectStoreCredentials,
    #[case] kept: bool,
) {
    let wire: wire::ConnectionConfig = serde_json::from_value(json!({
        "config": {"aws_s3_config": {
            "bucket": "exports",
            "credentials": serde_json::to_value(&credentials).expect("serialize credentials")
        }}
    }))
    .expect("deserialize");

    let ConnectionConfig::ObjectStore(store) = ConnectionConfig::from_wire(&wire).expect("decode")
    else {
        panic!("expected object store");
    };
    assert_eq!(store.credentials.is_some(), kept);
}

#[test]
fn test_object_store_round_trip() {
    let config = ConnectionConfig::ObjectStore(ObjectStoreConnection {
        path_prefix: Some("daily/".to_string()),
        region: Some("us-west-2".to_string()),
        credentials: Some(ObjectStoreCredentials {
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some(Secret::new("shh")),
            ..Default::default()
        }),
        ..ObjectStoreConnection::new("exports")
    });
    assert_eq!(round_trip(&config), config);
}

#[test]
fn test_unknown_tags_are_named() {
    let wire: wire::ConnectionConfig =
        serde_json::from_value(json!({"config": {"mssql_config": {}}})).expect("deserialize");
    assert_eq!(
        ConnectionConfig::from_wire(&wire),
        Err(ConvertError::UnsupportedVariant("mssql_config".to_string()))
    );

    let wire: wire::ConnectionConfig = serde_json::from_value(json!({
        "config": {"pg_config": {"connection_config": {"dsn": "postgres://x"}}}
    }))
    .expect("deserialize");
    assert_eq!(
        ConnectionConfig::from_wire(&wire),
        Err(ConvertError::UnsupportedVariant("dsn".to_string()))
    );
}

#[test]
fn test_slot_form_precedence_and_strict_check() {
    let slots: ConnectionConfigSlots = serde_json::from_value(json!({
        "mysql": {"url": "mysql://m"},
        "postgres": {"url": "postgres://p"}
    }))
    .expect("slot form");

    assert_eq!(slots.populated(), vec!["postgres", "mysql"]);
    assert!(matches!(
        slots.ensure_single(),
        Err(ConvertError::InvalidVariantSelection(msg))
            if msg == "connection config: multiple variants populated (postgres, mysql)"
    ));

    let config = ConnectionConfig::try_from(slots).expect("first in declared order wins");
    let ConnectionConfig::Postgres(postgres) = config else {
        panic!("postgres is declared first");
    };
    assert_eq!(
        postgres.endpoint,
        DatabaseEndpoint::<PostgresOptions>::Url("postgres://p".to_string())
    );
}

#[test]
fn test_empty_slot_form_is_missing_selection() {
    let err = ConnectionConfig::try_from(ConnectionConfigSlots::default()).expect_err("empty");
    assert_eq!(err, ConvertError::missing_variant("connection config"));
}

#[test]
fn test_empty_credentials_are_omitted_on_encode() {
    let config = ConnectionConfig::ObjectStore(ObjectStoreConnection {
        credentials: Some(ObjectStoreCredentials::default()),
        ..ObjectStoreConnection::new("exports")
    });

    let wire = config.to_wire().expect("encode");
    let Some(wire::ConnectionConfigKind::AwsS3Config(store)) = &wire.config else {
        panic!("expected aws_s3_config");
    };
    assert_eq!(store.credentials, None);
    assert_eq!(
        serde_json::to_value(&wire).expect("serialize"),
        json!({"config": {"aws_s3_config": {"bucket": "exports"}}})
    );
}

#[test]
fn test_passphrase_tunnel_round_trip() {
    let config = ConnectionConfig::Postgres(
        PostgresConnection::url("postgres://db.internal/app").with_tunnel(SshTunnel {
            host: "bastion".to_string(),
            port: 22,
            user: "jump".to_string(),
            known_host_public_key: None,
            auth: TunnelAuth::Passphrase {
                value: Secret::new("hunter2"),
            },
        }),
    );

    let json = serde_json::to_value(config.to_wire().expect("encode")).expect("serialize");
    assert_eq!(
        json["config"]["pg_config"]["tunnel"]["authentication"],
        json!({"auth_config": {"passphrase": {"value": "hunter2"}}})
    );
    assert_eq!(round_trip(&config), config);
}

#[test]
fn test_malformed_field_form_names_the_field() {
    let wire: wire::ConnectionConfig = serde_json::from_value(json!({
        "config": {"pg_config": {"connection_config": {"connection": {
            "host": "h", "port": "5432", "name": "n", "user": "u", "pass": "p"
        }}}}
    }))
    .expect("deserialize");

    let err = ConnectionConfig::from_wire(&wire).expect_err("port is a string");
    assert!(!err.is_schema_mismatch());
    assert!(
        matches!(&err, ConvertError::InvalidVariantSelection(msg) if msg.starts_with("connection.port: invalid type")),
        "unexpected error: {err}"
    );
}

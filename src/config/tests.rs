use super::*;

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr, "127.0.0.1:8000".parse().expect("addr"));
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 8);
    assert_eq!(settings.database.statement_timeout, Duration::from_millis(5000));
    assert_eq!(settings.cache.ttl_seconds.get(), 60);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.cache.ttl_seconds = Some(120);

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        cache_ttl_seconds: Some(5),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.cache.ttl_seconds.get(), 5);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());

    let mut raw = RawSettings::default();
    raw.database.url = Some(" postgres://localhost/sectorboard ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://localhost/sectorboard")
    );
}

#[test]
fn zero_values_are_rejected() {
    let cases: Vec<(RawSettings, &str)> = vec![
        (
            RawSettings {
                server: RawServerSettings {
                    port: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
            "server.port",
        ),
        (
            RawSettings {
                server: RawServerSettings {
                    graceful_shutdown_seconds: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
            "server.graceful_shutdown_seconds",
        ),
        (
            RawSettings {
                database: RawDatabaseSettings {
                    max_connections: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
            "database.max_connections",
        ),
        (
            RawSettings {
                database: RawDatabaseSettings {
                    statement_timeout_ms: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
            "database.statement_timeout_ms",
        ),
        (
            RawSettings {
                cache: RawCacheSettings {
                    ttl_seconds: Some(0),
                },
                ..Default::default()
            },
            "cache.ttl_seconds",
        ),
    ];

    for (raw, expected_key) in cases {
        match Settings::from_raw(raw) {
            Err(LoadError::Invalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected invalid `{expected_key}`, got {other:?}"),
        }
    }
}

#[test]
fn invalid_host_and_level_are_reported() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "server.host",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "logging.level",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["sectorboard"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "sectorboard",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--cache-ttl-seconds",
        "15",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.cache_ttl_seconds, Some(15));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_keys_issue_arguments() {
    let args = CliArgs::parse_from([
        "sectorboard",
        "keys",
        "--database-url",
        "postgres://example",
        "issue",
        "--name",
        "dashboard",
        "--expires-in-days",
        "30",
    ]);

    match args.command.expect("keys command") {
        Command::Keys(keys) => {
            assert_eq!(
                keys.database.database_url.as_deref(),
                Some("postgres://example")
            );
            match keys.command {
                KeysCommand::Issue(issue) => {
                    assert_eq!(issue.name, "dashboard");
                    assert_eq!(issue.expires_in_days, Some(30));
                    assert!(issue.description.is_none());
                }
                _ => panic!("wrong keys command parsed"),
            }
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_keys_revoke_requires_uuid() {
    let id = "8c6f1c3e-9a51-4a4f-9b3e-0f5f3c1f2a10";
    let args = CliArgs::parse_from(["sectorboard", "keys", "revoke", id]);
    match args.command.expect("keys command") {
        Command::Keys(KeysArgs {
            command: KeysCommand::Revoke(revoke),
            ..
        }) => assert_eq!(revoke.id.to_string(), id),
        _ => panic!("wrong command parsed"),
    }

    assert!(CliArgs::try_parse_from(["sectorboard", "keys", "revoke", "nope"]).is_err());
}

#[test]
fn parse_migrate_with_database_override() {
    let args = CliArgs::parse_from(["sectorboard", "migrate", "--database-url", "postgres://m"]);
    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(migrate.database.database_url.as_deref(), Some("postgres://m"))
        }
        _ => panic!("wrong command parsed"),
    }
}

use api_lib::config::{Config, ConfigError, DataSource};
use std::collections::HashMap;
use tracing::Level;

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn postgres_is_the_default_source_and_needs_a_url() {
    let err = load(&[]).expect_err("DATABASE_URL is required");
    assert!(matches!(err, ConfigError::MissingVar(ref v) if v == "DATABASE_URL"));

    let config = load(&[("DATABASE_URL", "postgres://localhost/ledger")]).expect("config");
    assert_eq!(
        config.data_source,
        DataSource::Postgres {
            database_url: "postgres://localhost/ledger".to_string()
        }
    );
    assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.upcoming_window_days, 7);
}

#[test]
fn demo_mode_needs_no_database() {
    let config = load(&[
        ("DATA_SOURCE", "Demo"),
        ("BIND_ADDRESS", "127.0.0.1:8080"),
        ("RUST_LOG", "debug"),
        ("UPCOMING_WINDOW_DAYS", "14"),
    ])
    .expect("config");
    assert_eq!(config.data_source, DataSource::Demo);
    assert_eq!(config.bind_address.port(), 8080);
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(config.upcoming_window_days, 14);
}

#[test]
fn invalid_values_are_reported_by_variable() {
    let cases = [
        ("DATA_SOURCE", "spreadsheet"),
        ("BIND_ADDRESS", "not-an-address"),
        ("RUST_LOG", "chatty"),
        ("UPCOMING_WINDOW_DAYS", "-3"),
    ];
    for (key, value) in cases {
        let mut vars = vec![("DATA_SOURCE", "demo")];
        vars.retain(|(k, _)| *k != key);
        vars.push((key, value));
        match load(&vars) {
            Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, key),
            other => panic!("{key}={value} should be rejected, got {other:?}"),
        }
    }
}

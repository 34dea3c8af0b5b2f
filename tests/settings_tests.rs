mod test_utils;

use test_utils::*;

use config::{Config, File, FileFormat};

use chosn_backend::settings::{AppConfig, AppEnvironment, JwtKeys};

fn parse(toml: &str) -> AppConfig {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn debug_output_redacts_secrets() {
    let config = test_config();

    let printed = format!("{config:?}");

    assert!(!printed.contains(TEST_JWT_SECRET));
    assert!(!printed.contains("test-client-secret"));
    assert!(!printed.contains("chosn:chosn"));
    assert!(printed.contains("[REDACTED]"));
    assert!(!format!("{:?}", JwtKeys::from(&config)).contains(TEST_JWT_SECRET));
}

#[test]
fn cors_origins_split_on_commas() {
    let mut config = test_config();
    config.cors_allowed_origins = vec![
        "https://chosn.dev, https://www.chosn.dev".to_string(),
        " ".to_string(),
    ];

    assert_eq!(config.cors_origins(), vec!["https://chosn.dev", "https://www.chosn.dev"]);
}

#[test]
fn github_oauth_needs_both_credentials() {
    let mut config = test_config();
    assert!(config.github_oauth_enabled());

    config.github_client_secret.clear();
    assert!(!config.github_oauth_enabled());
}

#[test]
fn environments_parse_case_insensitively() {
    assert_eq!("Production".parse::<AppEnvironment>().unwrap(), AppEnvironment::Production);
    assert_eq!(AppEnvironment::Testing.to_string(), "testing");
    assert!("staging".parse::<AppEnvironment>().is_err());
}

#[test]
fn migrations_only_run_when_enabled() {
    assert!(!parse("database_url = \"postgres://localhost/chosn\"").run_migrations);
    assert!(parse("run_migrations = true").run_migrations);
    assert!(!test_config().run_migrations);
}

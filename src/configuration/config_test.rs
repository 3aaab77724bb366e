use anyhow::Result;
use tokio::fs;

use super::find_arg;
use super::possible_values;
use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    assert!(res.contains("api-url = \"http://localhost:8000\""));
    assert!(res.contains("backend = \"stream\""));
    assert!(res.contains("backend-health-check-timeout = 1000"));
    assert!(res.contains("model = \"gpt-3.5-turbo\""));
    assert!(res.contains("[possible values: stream, answer]"));
    assert!(res.contains("# history-dir = "));
    assert!(!res.contains("config-file"));
}

#[test]
fn it_matches_the_example_config() {
    let example = std::fs::read_to_string("./config.example.toml").unwrap();
    let res = Config::serialize_default(cli::build());

    for line in example.lines().filter(|line| return !line.starts_with('#')) {
        assert!(res.contains(line), "missing line: {line}");
    }
}

#[test]
fn it_finds_possible_values_from_clap() {
    let cmd = cli::build();

    assert_eq!(
        possible_values(find_arg(&cmd, ConfigKey::Model)),
        vec!["gpt-3.5-turbo", "gpt-4-turbo-preview"]
    );
    assert!(possible_values(find_arg(&cmd, ConfigKey::ApiURL)).is_empty());
}

#[test]
fn it_rejects_unknown_models_from_args() {
    let res = cli::build().try_get_matches_from(vec!["chat", "--model", "gpt-2"]);
    assert!(res.is_err());
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec!["chat", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["chat", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;

    let err = res.unwrap_err().to_string();
    assert!(err.contains("invalid value for key 'backend': carrier-pigeon"));
    assert!(err.contains("Possible values are: stream, answer"));

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_unsupported_value_types() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_file = dir.path().join("config.toml");
    fs::write(&config_file, "model = true\n").await?;

    let matches = cli::build().try_get_matches_from(vec![
        "chat",
        "-c",
        config_file.to_str().unwrap_or_default(),
    ])?;
    let res = Config::load(cli::build(), vec![&matches]).await;

    assert!(res
        .unwrap_err()
        .to_string()
        .contains("unsupported value type for key 'model'"));

    return Ok(());
}

#[test]
fn it_names_keys_in_kebab_case() {
    assert_eq!(ConfigKey::ApiURL.name(), "api-url");
    assert_eq!(
        ConfigKey::BackendHealthCheckTimeout.name(),
        "backend-health-check-timeout"
    );
    assert_eq!(ConfigKey::ConfigFile.name(), ConfigKey::ConfigFile.to_string());
}

#[test]
fn it_reads_global_flags_by_key() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "chat",
        "ask",
        "--api-url",
        "http://kb.internal:9000",
        "--model",
        "gpt-4-turbo-preview",
        "What is a study?",
    ])?;
    let (_, ask_matches) = matches.subcommand().unwrap();

    assert_eq!(
        ask_matches.get_one::<String>(ConfigKey::ApiURL.name()),
        Some(&"http://kb.internal:9000".to_string())
    );
    assert_eq!(
        ask_matches.get_one::<String>(ConfigKey::Model.name()),
        Some(&"gpt-4-turbo-preview".to_string())
    );

    return Ok(());
}

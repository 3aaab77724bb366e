#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use strum::IntoStaticStr;
use tokio::fs;

use crate::domain::models::BackendName;
use crate::domain::models::ModelName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

pub const APP_DIR_NAME: &str = "thinkscript-chat";

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    EnumIter,
    EnumVariantNames,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    Backend,
    BackendHealthCheckTimeout,
    ConfigFile,
    HistoryDir,
    Model,
}

impl ConfigKey {
    /// The key as used for CLI flags, arg ids, and the config file.
    pub fn name(self) -> &'static str {
        return self.into();
    }
}

fn find_arg(cmd: &Command, key: ConfigKey) -> Option<&Arg> {
    let name = key.to_string();
    return cmd
        .get_arguments()
        .find(|e| return e.get_long() == Some(name.as_str()));
}

fn possible_values(arg: Option<&Arg>) -> Vec<String> {
    return arg
        .map(|arg| {
            return arg
                .get_possible_values()
                .iter()
                .map(|e| return e.get_name().to_string())
                .collect::<Vec<String>>();
        })
        .unwrap_or_default();
}

/// Directory the debug log is written to, overridable with `THINKSCRIPT_LOG_DIR`.
pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("THINKSCRIPT_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir().unwrap_or_default().join(APP_DIR_NAME);
}

pub struct Config {}

impl Config {
    /// Returns the loaded value for `key`, falling back to its default when
    /// config hasn't been loaded.
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return Config::default(key);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiURL => return "http://localhost:8000".to_string(),
            ConfigKey::Backend => return BackendName::Stream.to_string(),
            ConfigKey::BackendHealthCheckTimeout => return "1000".to_string(),
            ConfigKey::Model => return ModelName::default().to_string(),
            ConfigKey::ConfigFile => {
                return dirs::config_dir()
                    .unwrap_or_default()
                    .join(APP_DIR_NAME)
                    .join("config.toml")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::HistoryDir => {
                return dirs::cache_dir()
                    .unwrap_or_default()
                    .join(APP_DIR_NAME)
                    .to_string_lossy()
                    .to_string();
            }
        }
    }

    /// Layers defaults, then the TOML config file, then CLI arguments and
    /// environment variables.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key));
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                let val = match doc.get(&key.to_string()) {
                    Some(val) => val,
                    None => continue,
                };

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }

                    // Use clap value parsers to do validation.
                    let possible_values = possible_values(find_arg(&cmd, key));
                    if !possible_values.is_empty()
                        && !possible_values.contains(&val_str.to_string())
                    {
                        bail!(format!("{config_file} has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                    }
                    Config::set(key, val_str);
                } else {
                    bail!(format!(
                        "{config_file} has an unsupported value type for key '{key}'"
                    ));
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val);
                }
            }
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            backend = Config::get(ConfigKey::Backend),
            model = Config::get(ConfigKey::Model),
            history_dir = Config::get(ConfigKey::HistoryDir),
            config_file = config_file,
            "config"
        );

        return Ok(());
    }

    /// Renders every setting with its help text as a commented TOML file.
    pub fn serialize_default(cmd: Command) -> String {
        return ConfigKey::iter()
            .filter(|key| return *key != ConfigKey::ConfigFile)
            .map(|key| {
                let arg = find_arg(&cmd, key);
                let mut description = arg
                    .and_then(|arg| return arg.get_help())
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let possible_values = possible_values(arg);
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let mut val = Config::default(key);
                if key == ConfigKey::HistoryDir {
                    // Machine specific, left for the user to opt into.
                    val = format!("# {key} = \"{val}\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return format!("# {description}\n{val}");
            })
            .collect::<Vec<String>>()
            .join("\n\n");
    }
}

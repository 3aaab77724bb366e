use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::log_dir;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::models::ModelName;
use crate::domain::services::actions::help_text;
use crate::domain::services::ContentParser;
use crate::domain::services::HistoryStore;

/// What `main` should run once the command line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Run {
    Chat,
    Ask(String),
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::get(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn print_history() -> Result<()> {
    let messages = HistoryStore::default().load().await;
    if messages.is_empty() {
        println!("There is no chat history yet. Ask your first question!");
        return Ok(());
    }

    let text = messages
        .iter()
        .map(|message| {
            return format!(
                "{} ({})\n{}",
                Paint::new(message.role.label()).bold(),
                message.timestamp,
                message.content
            );
        })
        .collect::<Vec<String>>()
        .join("\n\n");

    println!("{text}");
    return Ok(());
}

async fn print_parsed_file(file: &str) -> Result<()> {
    let content = fs::read_to_string(file).await?;
    let parsed = ContentParser::parse(&content);
    println!("{}", serde_json::to_string_pretty(&parsed)?);

    return Ok(());
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Asks a single question and streams the answer to stdout. The exchange is saved to the chat history.")
        .arg(
            Arg::new("question")
                .help("The question to ask.")
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for ThinkScript Chat")
        .hide(true)
        .subcommand(
            Command::new("parse")
                .about("Parses a saved answer and prints the structured content as JSON.")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .help("Markdown file to parse.")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running with environment variable RUST_LOG=thinkscript")
        );
}

fn subcommand_history() -> Command {
    return Command::new("history")
        .about("Manage the saved chat history.")
        .arg_required_else_help(true)
        .subcommand(Command::new("path").about("Print the chat history file path."))
        .subcommand(Command::new("show").about("Print every saved message."))
        .subcommand(Command::new("clear").about("Delete the saved chat history."));
}

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiURL.name())
        .long(ConfigKey::ApiURL.name())
        .env("THINKSCRIPT_API_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the knowledge base API. [default: {}]",
            Config::default(ConfigKey::ApiURL)
        ))
        .global(true);
}

fn arg_backend() -> Arg {
    return Arg::new(ConfigKey::Backend.name())
        .short('b')
        .long(ConfigKey::Backend.name())
        .env("THINKSCRIPT_BACKEND")
        .num_args(1)
        .help(format!(
            "The backend used to talk to the knowledge base. [default: {}]",
            Config::default(ConfigKey::Backend)
        ))
        .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        .global(true);
}

fn arg_backend_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::BackendHealthCheckTimeout.name())
        .long(ConfigKey::BackendHealthCheckTimeout.name())
        .env("THINKSCRIPT_BACKEND_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(
            format!("Time to wait in milliseconds before timing out when doing a healthcheck for a backend. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)),
        )
        .global(true);
}

fn arg_history_dir() -> Arg {
    return Arg::new(ConfigKey::HistoryDir.name())
        .long(ConfigKey::HistoryDir.name())
        .env("THINKSCRIPT_HISTORY_DIR")
        .num_args(1)
        .help(format!(
            "Directory the chat history is saved to. [default: {}]",
            Config::default(ConfigKey::HistoryDir)
        ))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.name())
        .short('m')
        .long(ConfigKey::Model.name())
        .env("THINKSCRIPT_MODEL")
        .num_args(1)
        .help(format!(
            "The model the knowledge base answers with. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .value_parser(PossibleValuesParser::new(ModelName::VARIANTS))
        .global(true);
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.name())
        .short('c')
        .long(ConfigKey::ConfigFile.name())
        .env("THINKSCRIPT_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("thinkscript-chat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the chat interface. This is the default."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_history())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_api_url())
        .arg(arg_backend())
        .arg(arg_backend_health_check_timeout())
        .arg(arg_history_dir())
        .arg(arg_model())
        .arg(arg_config_file());
}

fn question(matches: &ArgMatches) -> String {
    return matches
        .get_many::<String>("question")
        .map(|words| return words.map(|e| return e.as_str()).collect::<Vec<&str>>())
        .unwrap_or_default()
        .join(" ");
}

/// Handles the command line. Returns `None` when the subcommand already did
/// all of its work and the process should exit.
pub async fn parse() -> Result<Option<Run>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("parse", parse_matches)) => {
                    if let Some(file) = parse_matches.get_one::<String>("file") {
                        print_parsed_file(file).await?;
                    }
                }
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(Run::Ask(question(subcmd_matches))));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }

            return Ok(None);
        }
        Some(("config", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    println!("{}", Config::get(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("history", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("path", _)) => {
                    println!("{}", HistoryStore::default().path().to_string_lossy());
                }
                Some(("show", _)) => {
                    print_history().await?;
                }
                Some(("clear", _)) => {
                    HistoryStore::default().clear().await;
                    println!("Cleared the chat history");
                }
                _ => {
                    subcommand_history().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Some(Run::Chat));
}

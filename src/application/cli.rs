#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
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

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthClient;
use crate::domain::models::FirebaseConfig;
use crate::domain::models::Persistence;
use crate::domain::services::actions::help_text;
use crate::infrastructure::identity::IdentityManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!(
        "Created default config file at {}",
        config_file_path.to_string_lossy()
    );
    return Ok(());
}

/// Connects to the identity provider with the durable session restored.
async fn connect_identity() -> Result<AuthClient> {
    let config = FirebaseConfig::from_config();
    config.validate()?;

    let client = IdentityManager::connect(&config);
    client.set_persistence(Persistence::Local).await?;

    return Ok(client);
}

async fn auth_login(email: &str, password: &str) -> Result<()> {
    let client = connect_identity().await?;
    let user = client.sign_in_with_password(email, password).await?;

    println!(
        "Signed in as {}",
        user.email.unwrap_or_else(|| return user.uid.to_string())
    );
    return Ok(());
}

async fn auth_logout() -> Result<()> {
    let client = connect_identity().await?;
    if client.current_user().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    client.sign_out().await?;
    println!("Signed out.");
    return Ok(());
}

async fn auth_status() -> Result<()> {
    let client = connect_identity().await?;
    match client.current_user() {
        Some(user) => {
            println!(
                "Signed in as {}",
                user.email.unwrap_or_else(|| return user.uid.to_string())
            );
        }
        None => {
            println!("Not signed in. Run `socialsync auth login` to sign in.");
        }
    }

    return Ok(());
}

fn subcommand_auth() -> Command {
    return Command::new("auth")
        .about("Manage the account used to talk to SocialSync.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Sign in with email and password. The session is kept until you log out.")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .env("SOCIALSYNC_EMAIL")
                        .help("Account email address.")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .env("SOCIALSYNC_PASSWORD")
                        .hide_env_values(true)
                        .help("Account password.")
                        .num_args(1)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out and forget the stored session."))
        .subcommand(Command::new("status").about("Show the signed in account, if any."));
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new chat session.");
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
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
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for SocialSync")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running SocialSync with environment variable RUST_LOG=socialsync")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_firebase(key: ConfigKey, env: &'static str, help: &'static str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .hide_env_values(true)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn log_path() -> path::PathBuf {
    let log_dir = std::env::var("SOCIALSYNC_LOG_DIR")
        .map(path::PathBuf::from)
        .unwrap_or_else(|_| {
            return dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("socialsync");
        });

    return log_dir.join("debug.log");
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
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("socialsync")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_auth())
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("SOCIALSYNC_API_URL")
                .num_args(1)
                .help(format!("SocialSync chatbot API URL. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::AuthDir.to_string())
                .long(ConfigKey::AuthDir.to_string())
                .env("SOCIALSYNC_AUTH_DIR")
                .num_args(1)
                .help(format!("Directory where the signed in session is stored. [default: {}]", Config::default(ConfigKey::AuthDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SOCIALSYNC_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_firebase(
            ConfigKey::FirebaseApiKey,
            "SOCIALSYNC_FIREBASE_API_KEY",
            "Firebase web API key. Required for signing in.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseAuthDomain,
            "SOCIALSYNC_FIREBASE_AUTH_DOMAIN",
            "Firebase auth domain. Required for signing in.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseProjectId,
            "SOCIALSYNC_FIREBASE_PROJECT_ID",
            "Firebase project ID. Required for signing in.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseStorageBucket,
            "SOCIALSYNC_FIREBASE_STORAGE_BUCKET",
            "Firebase storage bucket.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseMessagingSenderId,
            "SOCIALSYNC_FIREBASE_MESSAGING_SENDER_ID",
            "Firebase messaging sender ID.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseAppId,
            "SOCIALSYNC_FIREBASE_APP_ID",
            "Firebase app ID.",
        ))
        .arg(arg_firebase(
            ConfigKey::FirebaseMeasurementId,
            "SOCIALSYNC_FIREBASE_MEASUREMENT_ID",
            "Firebase measurement ID.",
        ));
}

async fn parse_auth(matches: &ArgMatches, auth_matches: &ArgMatches) -> Result<()> {
    match auth_matches.subcommand() {
        Some(("login", login_matches)) => {
            Config::load(build(), vec![matches, auth_matches, login_matches]).await?;
            let email = login_matches
                .get_one::<String>("email")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            let password = login_matches
                .get_one::<String>("password")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            auth_login(&email, &password).await?;
        }
        Some(("logout", logout_matches)) => {
            Config::load(build(), vec![matches, auth_matches, logout_matches]).await?;
            auth_logout().await?;
        }
        Some(("status", status_matches)) => {
            Config::load(build(), vec![matches, auth_matches, status_matches]).await?;
            auth_status().await?;
        }
        _ => {
            subcommand_auth().print_long_help()?;
        }
    }

    return Ok(());
}

/// Parses the command line. Returns true when the chat UI should start.
pub async fn parse() -> Result<bool> {
    return parse_matches(build().get_matches()).await;
}

/// Runs the one-shot subcommands. Returns true when the chat UI should start.
pub async fn parse_matches(matches: ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("auth", auth_matches)) => {
            parse_auth(&matches, auth_matches).await?;
            return Ok(false);
        }
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }

            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}

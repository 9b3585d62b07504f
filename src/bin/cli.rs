use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;

use rusty_creds::auth::extract_bearer_token;
use rusty_creds::config::CredsConfig;
use rusty_creds::error::Result;
use rusty_creds::{AuthService, UserRole};

/// Administer the credential store and exercise the token flow
#[derive(Parser)]
#[command(name = "rusty_creds", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store with its seed administrator if it does not exist
    Init,
    /// Register a student account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RUSTY_CREDS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Create an account with any role
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RUSTY_CREDS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long, default_value = "student")]
        role: UserRole,
    },
    /// Authenticate and print a bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RUSTY_CREDS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Resolve a token (or "Bearer <token>" header value) to its user
    Whoami {
        #[arg(long, env = "RUSTY_CREDS_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Resolve a token and check it against a role allow-list
    Authorize {
        #[arg(long, env = "RUSTY_CREDS_TOKEN", hide_env_values = true)]
        token: String,
        #[arg(long, value_delimiter = ',', required = true)]
        roles: Vec<UserRole>,
    },
    /// Disable an account
    Disable {
        #[arg(long)]
        email: String,
    },
    /// Re-enable an account
    Enable {
        #[arg(long)]
        email: String,
    },
}

fn main() {
    init_environment(None);

    let cli = Cli::parse();

    let config = match CredsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: store={}, token_ttl={}m",
        config.store_path.display(),
        config.token_ttl.num_minutes()
    );

    if let Err(e) = run(cli.command, &config) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &CredsConfig) -> Result<()> {
    let service = AuthService::from_config(config)?;

    match command {
        Command::Init => {
            let users = service.store().load_all()?;
            println!(
                "credential store {} holds {} user(s)",
                service.store().path().display(),
                users.len()
            );
        }
        Command::Register { email, password, full_name } => {
            print_json(&service.register(&email, &password, full_name.as_deref())?);
        }
        Command::CreateUser { email, password, full_name, role } => {
            print_json(&service.create_user(&email, &password, full_name.as_deref(), role)?);
        }
        Command::Login { email, password } => {
            print_json(&service.login(&email, &password)?);
        }
        Command::Whoami { token } => {
            let token = normalize_token(token);
            print_json(&service.resolve_identity(&token)?.public());
        }
        Command::Authorize { token, roles } => {
            let token = normalize_token(token);
            print_json(&service.authorize(&token, &roles)?.public());
        }
        Command::Disable { email } => {
            print_json(&service.set_disabled(&email, true)?);
        }
        Command::Enable { email } => {
            print_json(&service.set_disabled(&email, false)?);
        }
    }

    Ok(())
}

/// Loads `.env` (or `dotenv_path`) before starting the logger so RUST_LOG
/// from the file applies
fn init_environment(dotenv_path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match dotenv_path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    // Initialize logging
    if let Err(e) = env_logger::try_init() {
        eprintln!("Logger already initialized: {}", e);
    }

    match loaded {
        Ok(path) => {
            info!("Environment variables loaded from {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Failed to load .env file: {}", e);
            None
        }
    }
}

// Accept either a raw token or a full Authorization header value
fn normalize_token(raw: String) -> String {
    extract_bearer_token(&raw).unwrap_or(raw)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to render output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_honors_log_level_from_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "RUST_LOG=debug\n").unwrap();
        std::env::remove_var("RUST_LOG");

        assert_eq!(init_environment(Some(&path)), Some(path.clone()));
        assert!(log::log_enabled!(log::Level::Debug));
    }
}

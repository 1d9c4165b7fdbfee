//! CLI module for identity-core
//!
//! Operator subcommands:
//! - `create-user`: run the create pipeline and print the record to seed
//! - `hash-password`: print a fresh password hash
//! - `verify-password`: check a password against a stored hash

pub mod create_user;
pub mod password;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::{Argon2Hasher, PasswordService};

/// identity-core - user identity and access-control tooling
#[derive(Parser)]
#[command(name = "identity-core")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the create pipeline for one account and print the stored form
    CreateUser(create_user::CreateUserArgs),

    /// Hash a password with the configured work factor
    HashPassword(password::HashPasswordArgs),

    /// Check a password against a stored hash
    VerifyPassword(password::VerifyPasswordArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = config_or_default(AppConfig::load());
    logging::init_logging(&config.logging);

    if let Some(err) = load_error {
        warn!(error = %err, "Invalid configuration, using defaults");
    }

    config
}

/// Fall back to the default configuration, keeping the error to report once
/// logging is up
fn config_or_default(
    loaded: Result<AppConfig, config::ConfigError>,
) -> (AppConfig, Option<config::ConfigError>) {
    match loaded {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}

fn password_service(config: &AppConfig) -> PasswordService<Argon2Hasher> {
    PasswordService::new(Arc::new(Argon2Hasher::new(config.password.clone())))
}

/// Ask `question` on stderr and read one line from stdin, without its line ending
fn prompt(question: &str) -> anyhow::Result<String> {
    eprint!("{} ", question);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

//! CLI module for user-credentials
//!
//! Provides subcommands for working with user records:
//! - `validate`: check a candidate record against the field rules
//! - `register`: validate, digest and store a new user
//! - `authenticate`: check an email/password pair against the store

pub mod authenticate;
pub mod register;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// user-credentials - user registration and password authentication
#[derive(Parser)]
#[command(name = "user-credentials")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a candidate record without touching storage
    Validate(validate::ValidateArgs),

    /// Register a new user in the configured database
    Register(register::RegisterArgs),

    /// Verify an email and password against the configured database
    Authenticate(authenticate::AuthenticateArgs),
}

/// Load `.env` and configuration, then install logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = resolve_config(AppConfig::load());
    init_logging(&config.logging);

    if let Some(e) = load_error {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
}

/// Fall back to defaults on a load failure, keeping the error so it can be
/// reported once logging is up.
fn resolve_config(
    loaded: Result<AppConfig, config::ConfigError>,
) -> (AppConfig, Option<config::ConfigError>) {
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    }
}

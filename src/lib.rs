//! User credentials
//!
//! Registration and authentication for user records:
//! - Email canonicalization (lowercase) before comparison and storage
//! - Field validation that reports every violated rule
//! - Argon2 password digests and password verification
//! - Pluggable storage with in-memory and PostgreSQL repositories

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use infrastructure::user::{Argon2Hasher, PostgresUserRepository, UserService};
use tracing::info;

/// Create the user service backed by PostgreSQL
pub async fn create_user_service(
    config: &AppConfig,
) -> anyhow::Result<UserService<PostgresUserRepository, Argon2Hasher>> {
    info!("Connecting to PostgreSQL...");
    let repository = PostgresUserRepository::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open user store: {}", e))?;
    info!("PostgreSQL connection established");

    let hasher = Argon2Hasher::from_config(&config.password_hashing)?;

    Ok(UserService::new(Arc::new(repository), Arc::new(hasher)))
}

//! Register command - stores a new user

use std::process::ExitCode;

use clap::Args;
use tracing::info;

use crate::domain::user::NewUser;
use crate::domain::DomainError;

/// Arguments for the register command
#[derive(Args, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, env = "USER_PASSWORD_CONFIRMATION", hide_env_values = true)]
    pub password_confirmation: Option<String>,
}

/// Register the user and print it as JSON. A rejected record prints its
/// failures and exits non-zero.
pub async fn run(args: RegisterArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap();
    let service = crate::create_user_service(&config).await?;

    let candidate = NewUser {
        name: args.name,
        email: args.email,
        password: Some(args.password),
        password_confirmation: args.password_confirmation,
    };

    match service.register(candidate).await {
        Ok(user) => {
            info!(user_id = %user.id(), "Registered");
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(DomainError::Rejected(failures)) => {
            println!("{}", serde_json::to_string_pretty(&failures)?);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

//! Validate command - runs the field rules on a candidate record

use std::process::ExitCode;

use clap::Args;

use crate::domain::user::{validate_fields, NewUser, ValidationContext, ValidationResult};

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "USER_PASSWORD_CONFIRMATION", hide_env_values = true)]
    pub password_confirmation: Option<String>,

    /// Validate as an update, where the password is optional
    #[arg(long)]
    pub update: bool,
}

/// Print the verdict as JSON; exits non-zero when the record is invalid.
///
/// Email uniqueness needs storage and is not checked here.
pub async fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    super::bootstrap();

    let context = if args.update {
        ValidationContext::Update
    } else {
        ValidationContext::Create
    };

    let candidate = NewUser {
        name: args.name,
        email: args.email,
        password: args.password,
        password_confirmation: args.password_confirmation,
    };

    let verdict = ValidationResult::from_failures(validate_fields(&candidate, context));
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(if verdict.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

//! Authenticate command - checks an email/password pair

use std::process::ExitCode;

use clap::Args;

use crate::domain::user::Authentication;

/// Arguments for the authenticate command
#[derive(Args, Clone)]
pub struct AuthenticateArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Print `authenticated` with the user, or `invalid credentials` and exit
/// non-zero. Never says whether the email or the password was wrong.
pub async fn run(args: AuthenticateArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap();
    let service = crate::create_user_service(&config).await?;

    match service.authenticate_by_email(&args.email, &args.password).await? {
        Authentication::AuthenticatedAs(user) => {
            println!("authenticated");
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(ExitCode::SUCCESS)
        }
        Authentication::Failed => {
            println!("invalid credentials");
            Ok(ExitCode::FAILURE)
        }
    }
}

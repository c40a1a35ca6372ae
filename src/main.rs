use std::process::ExitCode;

use clap::Parser;
use user_credentials::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Register(args) => cli::register::run(args).await,
        Command::Authenticate(args) => cli::authenticate::run(args).await,
    }
}

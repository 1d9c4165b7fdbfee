use clap::Parser;
use identity_core::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::CreateUser(args) => cli::create_user::run(args).await,
        Command::HashPassword(args) => cli::password::hash(args).await,
        Command::VerifyPassword(args) => cli::password::verify(args).await,
    }
}

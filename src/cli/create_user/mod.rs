//! create-user command - prepares the first account for a fresh install

use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{NewUser, PlaintextPassword, UserDraft};
use crate::infrastructure::{HtmlSanitizer, LifecycleGuard};

/// Arguments for the create-user command
#[derive(Args, Clone)]
pub struct CreateUserArgs {
    #[arg(long, default_value = "administrator")]
    pub username: String,

    #[arg(long, default_value = "administrator@example.com")]
    pub email: String,

    #[arg(long, default_value = "Administrator")]
    pub display_name: String,

    #[arg(long, default_value = "Administrator is the first user!")]
    pub biography: String,

    /// Language code (defaults to the configured one)
    #[arg(long)]
    pub language: Option<String>,

    /// Password; read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,

    /// Ask for display name, username and email interactively
    #[arg(long)]
    pub prompt: bool,
}

/// Run the create pipeline and print the record as it would be stored
pub async fn run(args: CreateUserArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let new_user = prepare(args, &config).await?;
    println!("{}", serde_json::to_string_pretty(&new_user)?);

    Ok(())
}

/// Build the guarded, validated record for `args`, prompting for what is missing
async fn prepare(args: CreateUserArgs, config: &AppConfig) -> anyhow::Result<NewUser> {
    let mut draft = UserDraft {
        display_name: Some(args.display_name),
        biography: Some(args.biography),
        language: args.language,
        active: Some(true),
        ..UserDraft::new(args.username, args.email)
    };

    if args.prompt {
        draft.display_name = Some(super::prompt("What is the displayName?")?);
        draft.username = super::prompt("What is the username?")?;
        draft.email = super::prompt("What is the email?")?;
    }

    let password = match args.password {
        Some(password) => password,
        None => super::prompt("What is the password?")?,
    };
    draft.password = Some(PlaintextPassword::new(password));

    info!(username = %draft.username, email = %draft.email, "Preparing user");

    let guard = LifecycleGuard::new(
        super::password_service(config),
        Arc::new(HtmlSanitizer::new()),
        config.users.clone(),
    );

    let new_user = guard.before_create(&draft).await?;
    guard.validate_new_user(&new_user)?;

    Ok(new_user)
}

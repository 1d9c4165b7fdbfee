//! hash-password / verify-password commands

use clap::Args;

use crate::domain::HashedPassword;

/// Arguments for the hash-password command
#[derive(Args, Clone)]
pub struct HashPasswordArgs {
    /// Password; read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the verify-password command
#[derive(Args, Clone)]
pub struct VerifyPasswordArgs {
    /// Stored hash to check against
    #[arg(long)]
    pub hash: String,

    /// Password; read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn hash(args: HashPasswordArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let password = read_password(args.password)?;

    let hash = super::password_service(&config)
        .generate_password(&password)
        .await?;

    println!("{}", hash.as_str());
    Ok(())
}

pub async fn verify(args: VerifyPasswordArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let password = read_password(args.password)?;
    let hash = HashedPassword::from_stored(args.hash);

    let matches = super::password_service(&config)
        .verify_password(&password, Some(&hash))
        .await?;

    println!("{}", matches);
    Ok(())
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => super::prompt("Password:"),
    }
}

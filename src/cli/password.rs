use anyhow::{Context, Result};
use catalog_auth::prelude::PasswordHasher;
use clap::Args;

use crate::config::CatalogConfig;

#[derive(Args, Clone, Debug)]
pub struct HashPasswordArgs {
    /// Plain-text password to hash
    pub password: String,
}

/// Prints the PHC hash of a password using the configured cost parameters.
pub fn cmd_hash_password(args: HashPasswordArgs, config: &CatalogConfig) -> Result<()> {
    let hasher = PasswordHasher::new(config.auth.password_hash);
    let phc = hasher
        .hash(&args.password)
        .context("failed to hash password")?;
    println!("{phc}");
    Ok(())
}

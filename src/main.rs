use std::path::PathBuf;

use anyhow::Result;
use catalog_cli::cli::{
    cmd_demo, cmd_hash_password, cmd_serve, init_logging, DemoArgs, HashPasswordArgs, ServeArgs,
};
use catalog_cli::load_config;
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Laptop catalog service with token-gated calls")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP/JSON gateway
    Serve(ServeArgs),

    /// Run the sample client flows against an in-process server
    Demo(DemoArgs),

    /// Print the hash of a password for use in seed users
    HashPassword(HashPasswordArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.debug)?;
    info!("Starting catalog v{}", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.config.as_ref()).await?;
    let config = loaded.config;

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args, config).await,
        Commands::Demo(args) => cmd_demo(args, config).await,
        Commands::HashPassword(args) => cmd_hash_password(args, &config),
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}

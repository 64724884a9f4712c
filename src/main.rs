use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod kv;
mod profile;

use commands::{AuthCommand, BookCommand, ConfigCommand, ProfileCommand, UserCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "nook")]
#[command(version)]
#[command(about = "Command-line client for the booknook book catalog", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, log in and out
    Auth(AuthCommand),

    /// Browse and manage books
    Book(BookCommand),

    /// Manage user accounts
    User(UserCommand),

    /// Manage the local profile
    Profile(ProfileCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("NOOK_LOG").unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    tracing::debug!("using API at {}", config.api_url.value);

    match cli.command {
        Some(Commands::Auth(cmd)) => cmd.run(&config).await?,
        Some(Commands::Book(cmd)) => cmd.run(&config).await?,
        Some(Commands::User(cmd)) => cmd.run(&config).await?,
        Some(Commands::Profile(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use geodb::LifecycleEvent;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "geolite-sync")]
#[command(about = "Keep a local GeoLite2 database in sync with MaxMind")]
struct Cli {
    /// Path to the config file (defaults to ~/.config/geolite-sync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the database
    #[arg(long, global = true)]
    install_dir: Option<PathBuf>,

    /// MaxMind license key (overrides MAXMIND_LICENSE_KEY)
    #[arg(long, global = true)]
    license_key: Option<String>,

    /// Show every step of the sync
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the database if the remote copy changed
    Sync,
    /// Entry point for package manager lifecycle hooks
    Hook {
        #[arg(value_enum)]
        event: HookEvent,
    },
    /// Show the local database location and stored hash
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum HookEvent {
    PostInstall,
    PostUpdate,
}

impl From<HookEvent> for LifecycleEvent {
    fn from(event: HookEvent) -> Self {
        match event {
            HookEvent::PostInstall => LifecycleEvent::PostInstall,
            HookEvent::PostUpdate => LifecycleEvent::PostUpdate,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let file_config = config::load_file_config(cli.config.as_deref());
    let overrides = Overrides::from_args_and_env(cli.license_key, cli.install_dir);
    let hook_config = config::resolve(file_config, overrides);

    match cli.command {
        Command::Sync => commands::sync::run(LifecycleEvent::Manual, &hook_config, cli.verbose).await,
        Command::Hook { event } => {
            commands::sync::run(event.into(), &hook_config, cli.verbose).await
        }
        Command::Status => {
            commands::status::run(&hook_config);
            Ok(())
        }
    }
}

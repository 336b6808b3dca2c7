use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use goldfeed::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for goldfeed::AppCommand {
    fn from(cmd: Commands) -> goldfeed::AppCommand {
        match cmd {
            Commands::Rates => goldfeed::AppCommand::Rates,
            Commands::Watch => goldfeed::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display current gold prices
    Rates,
    /// Refresh and display gold prices on an interval
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => goldfeed::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = goldfeed::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
base_currency: "USD"
local_currency: "EGP"
refresh_minutes: 5

providers:
  metalprice:
    base_url: "https://api.metalpriceapi.com"
  spotgold:
    base_url: "https://api.spotgold.io"
  commodities:
    base_url: "https://api.commodities.dev"
  currency:
    base_url: "https://open.er-api.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

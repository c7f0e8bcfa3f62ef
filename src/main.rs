use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ordersync::core::log::init_logging;

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

impl From<Commands> for ordersync::AppCommand {
    fn from(cmd: Commands) -> ordersync::AppCommand {
        match cmd {
            Commands::Sync { dry_run } => ordersync::AppCommand::Sync { dry_run },
            Commands::List => ordersync::AppCommand::List,
            Commands::Notify => ordersync::AppCommand::Notify,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Reconcile the store with the spreadsheet
    Sync {
        /// Report what would change without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored orders
    List,
    /// Notify about orders delivered today
    Notify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ordersync::cli::setup::setup(),
        Some(cmd) => ordersync::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

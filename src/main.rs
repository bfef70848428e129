use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use exagg::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration and example dataset
    Setup,
    /// Show the best offering of each exchange for a currency pair
    Best {
        /// Currency code given, e.g. CASHUSD
        #[arg(long)]
        from: String,
        /// Currency code received, e.g. CASHRUB
        #[arg(long)]
        to: String,
        /// Only exchanges serving this city code
        #[arg(long)]
        city: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show every exchange offering for a pair, one row per city
    Catalog {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for exagg::AppCommand {
    fn from(cmd: Commands) -> exagg::AppCommand {
        match cmd {
            Commands::Best {
                from,
                to,
                city,
                json,
            } => exagg::AppCommand::Best {
                valute_from: from,
                valute_to: to,
                city,
                json,
            },
            Commands::Catalog { from, to, json } => exagg::AppCommand::Catalog {
                valute_from: from,
                valute_to: to,
                json,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => exagg::cli::setup::setup_at_path(path),
            None => exagg::cli::setup::setup(),
        },
        Some(cmd) => exagg::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

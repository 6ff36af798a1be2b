use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinvert::core::log::init_logging;

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
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        /// Source currency code, e.g. BTC or HKD
        from: String,
        /// Target currency code
        to: String,
        /// Refresh on the configured interval
        #[arg(short, long)]
        watch: bool,
    },
    /// Show popular coin prices with 24h change
    Ticker {
        /// Refresh on the configured interval
        #[arg(short, long)]
        watch: bool,
    },
    /// Show a 24h price chart for a coin
    Chart {
        /// Currency code (BTC) or price-source id (bitcoin)
        coin: String,
    },
    /// Evaluate an arithmetic expression
    Calc {
        expression: String,
        /// Convert the result, e.g. --into BTC HKD
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        into: Option<Vec<String>>,
    },
    /// Show recent conversions
    History,
}

impl From<Commands> for coinvert::AppCommand {
    fn from(cmd: Commands) -> coinvert::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                watch,
            } => coinvert::AppCommand::Convert {
                amount,
                from,
                to,
                watch,
            },
            Commands::Ticker { watch } => coinvert::AppCommand::Ticker { watch },
            Commands::Chart { coin } => coinvert::AppCommand::Chart { coin },
            Commands::Calc { expression, into } => coinvert::AppCommand::Calc {
                expression,
                into: into.map(|pair| (pair[0].clone(), pair[1].clone())),
            },
            Commands::History => coinvert::AppCommand::History,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinvert::cli::setup::run(),
        Some(cmd) => coinvert::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

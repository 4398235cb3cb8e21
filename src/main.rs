use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxc::core::log::init_logging;

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
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
        /// Amount in the source currency
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Show the latest exchange rates against the provider's base currency
    Rates {
        /// Print the raw provider response as JSON
        #[arg(long)]
        json: bool,
        /// Currencies to list (defaults to USD, GBP and JPY)
        symbols: Vec<String>,
    },
    /// Show the demo shopping cart priced in a currency
    Cart {
        /// Display currency (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
        /// Set a line quantity, e.g. `--qty 4=2` (repeatable)
        #[arg(long = "qty", value_name = "ID=QTY")]
        quantities: Vec<String>,
    },
    /// Run the web backend and storefront page
    Serve {
        /// Port to listen on (defaults to PORT or the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Convert { from, to, amount } => fxc::AppCommand::Convert { from, to, amount },
            Commands::Rates { json, symbols } => fxc::AppCommand::Rates { symbols, json },
            Commands::Cart {
                currency,
                quantities,
            } => fxc::AppCommand::Cart {
                currency,
                quantities,
            },
            Commands::Serve { port } => fxc::AppCommand::Serve { port },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxc::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

use crate::core::ConversionRequest;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert { from: String, to: String, amount: f64 },
    Rates { symbols: Vec<String>, json: bool },
    Cart {
        currency: Option<String>,
        quantities: Vec<String>,
    },
    Serve { port: Option<u16> },
}

fn fixer_provider(config: &AppConfig) -> Result<providers::FixerProvider> {
    let access_key = config.access_key().context(
        "No Fixer access key configured. Set API_KEY or providers.fixer.access_key in the config file",
    )?;
    Ok(providers::FixerProvider::new(
        config.fixer_base_url(),
        access_key,
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxc starting...");

    let config = AppConfig::resolve(config_path)?;
    debug!(
        base_url = config.fixer_base_url(),
        currency = %config.currency,
        port = config.server.port,
        "Loaded config"
    );
    let provider = fixer_provider(&config)?;

    match command {
        AppCommand::Convert { from, to, amount } => {
            let request = ConversionRequest::new(&from, &to, amount);
            cli::convert::run(&provider, &request).await
        }
        AppCommand::Rates { symbols, json } => cli::rates::run(&provider, &symbols, json).await,
        AppCommand::Cart {
            currency,
            quantities,
        } => {
            let currency = currency.unwrap_or_else(|| config.currency.clone());
            cli::cart::run(&provider, &currency, &quantities).await
        }
        AppCommand::Serve { port } => {
            let state = server::AppState::new(Arc::new(provider), &config.currency);
            server::run_server(port.unwrap_or(config.server.port), state).await
        }
    }
}

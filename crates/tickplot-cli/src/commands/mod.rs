mod chart;
mod serve;
mod symbols;

use std::sync::Arc;

use serde_json::Value;
use tickplot_core::{
    AlphaVantageClient, ChartService, RangeFallback, ReqwestHttpClient, ServiceConfig,
};

use crate::cli::{Cli, Command, OutputFormat};
use crate::error::CliError;

/// Result of a one-shot command: JSON for `--format json`, lines for text.
pub struct CommandOutput {
    pub data: Value,
    pub lines: Vec<String>,
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let output = match &cli.command {
        Command::Serve(args) => {
            serve::run(cli, args).await?;
            return Ok(());
        }
        Command::Chart(args) => chart::run(cli, args).await?,
        Command::Symbols => symbols::run(cli)?,
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.data)?),
        OutputFormat::Text => {
            for line in output.lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Service wired from the global flags and the Alpha Vantage environment.
pub fn build_service(cli: &Cli, config: ServiceConfig) -> ChartService {
    let client = AlphaVantageClient::from_env(Arc::new(ReqwestHttpClient::new()))
        .with_timeout_ms(cli.timeout_ms);
    ChartService::new(client, config)
}

pub fn service_config(cli: &Cli) -> ServiceConfig {
    ServiceConfig {
        symbols_path: cli.symbols.clone(),
        fallback: if cli.fallback_to_latest {
            RangeFallback::ClampToLatest
        } else {
            RangeFallback::Disabled
        },
        ..ServiceConfig::with_static_dir(&cli.static_dir)
    }
}

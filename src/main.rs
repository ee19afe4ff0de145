//! Command-line access to the exchange adapters
//!
//! - `request`: issue a business request and print the JSON response
//! - `symbol` / `pair`: translate between `TRADE/STAKE` and native symbols
//! - `history`: print the normalized trade history
//! - `exchanges`: list registry keys
//!
//! Credentials come from `{EXCHANGE}_API_KEY`, `{EXCHANGE}_API_SECRET`,
//! `{EXCHANGE}_PASSPHRASE`, `{EXCHANGE}_SUBACCOUNT` and `{EXCHANGE}_BASE_URL`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use exchange_apis::{
    BusinessRequest, ExchangeApi, ExchangeConfig, ExchangeFactory, ExchangeType, HttpMethod,
    Params,
};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "exchange-apis")]
#[command(about = "Uniform requests against cryptocurrency exchange REST APIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the decoded response
    Request(RequestArgs),
    /// Native symbol for a pair
    Symbol {
        exchange: ExchangeType,
        /// Stake (quote) currency, e.g. USD
        stake: String,
        /// Trade (base) currency, e.g. ETH
        trade: String,
    },
    /// `TRADE/STAKE` for a native symbol
    Pair {
        exchange: ExchangeType,
        symbol: String,
        /// Load the exchange listing first
        #[arg(long)]
        refresh: bool,
    },
    /// Normalized executed-trade history
    History { exchange: ExchangeType },
    /// List supported exchanges
    Exchanges,
}

#[derive(Args)]
struct RequestArgs {
    exchange: ExchangeType,
    api_version: u32,
    endpoint: String,
    #[arg(long, default_value = "GET")]
    method: HttpMethod,
    /// Sign the request with the configured credentials
    #[arg(long)]
    auth: bool,
    /// Query parameter as `key=value`; repeat for lists
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// JSON request body
    #[arg(long)]
    body: Option<String>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {}", raw))
}

fn load_config(exchange: ExchangeType) -> Result<ExchangeConfig> {
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file(exchange.env_prefix())?;
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env(exchange.env_prefix())?;
    Ok(config)
}

fn connector(exchange: ExchangeType) -> Result<Box<dyn ExchangeApi>> {
    let config = load_config(exchange)?;
    tracing::debug!(?config, "Loaded configuration for {}", exchange);
    Ok(ExchangeFactory::create_connector(exchange, &config)?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn request(args: RequestArgs) -> Result<()> {
    let api = connector(args.exchange)?;

    let mut request = BusinessRequest::new(args.api_version, args.endpoint)
        .method(args.method)
        .params(args.params.into_iter().collect::<Params>());
    if args.auth {
        request = request.authenticated();
    }
    if let Some(body) = args.body {
        let body: Value = serde_json::from_str(&body).context("--body must be valid JSON")?;
        request = request.body(body);
    }

    let response = api.business_request(request).await?;
    print_json(&response)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Request(args) => request(args).await?,
        Commands::Symbol {
            exchange,
            stake,
            trade,
        } => println!("{}", connector(exchange)?.get_symbol(&stake, &trade)?),
        Commands::Pair {
            exchange,
            symbol,
            refresh,
        } => {
            let api = connector(exchange)?;
            if refresh {
                let loaded = api.refresh_symbols().await?;
                tracing::info!("Loaded {} symbols", loaded);
            }
            println!("{}", api.get_pair(&symbol)?);
        }
        Commands::History { exchange } => {
            let history = connector(exchange)?.trade_history().await?;
            print_json(&serde_json::to_value(history)?)?;
        }
        Commands::Exchanges => {
            for exchange in ExchangeType::all() {
                println!("{}", exchange);
            }
        }
    }

    Ok(())
}

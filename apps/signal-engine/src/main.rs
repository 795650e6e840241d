//! Signal Engine Binary
//!
//! Executes one trade signal against a configured broker account and prints
//! the outcome as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin signal-engine -- --config config.yaml --account main signal.json
//! # or pipe the signal in:
//! cat signal.json | cargo run --bin signal-engine -- --config config.yaml --account main
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)
//! - Any `${VAR}` credential references in the config file

use std::io::Read;

use anyhow::{Context, bail};
use signal_engine::{AccountRegistry, EngineConfig, TradeSignal};

/// Parsed command-line arguments.
struct CliArgs {
    config_path: String,
    account: String,
    signal_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = parse_args()?;

    let config = EngineConfig::load(&args.config_path)
        .with_context(|| format!("loading config from {}", args.config_path))?;
    let registry = AccountRegistry::new(&config.accounts, &config.execution)
        .context("building account registry")?;
    if registry.is_empty() {
        bail!("no accounts configured in {}", args.config_path);
    }

    let Some(executor) = registry.get(&args.account) else {
        bail!(
            "unknown account '{}'; configured accounts: {}",
            args.account,
            registry.account_names().join(", ")
        );
    };

    let signal = read_signal(args.signal_path.as_deref())?;
    tracing::info!(
        ticker = %signal.ticker,
        account = %args.account,
        "Signal received"
    );

    let outcome = executor
        .execute(&signal)
        .await
        .with_context(|| format!("executing signal for {}", signal.ticker))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "signal_engine=info"
                    .parse()
                    .expect("static directive 'signal_engine=info' is valid"),
            ),
        )
        .init();
}

/// Parse command-line arguments.
fn parse_args() -> anyhow::Result<CliArgs> {
    let mut config_path = "config.yaml".to_string();
    let mut account = None;
    let mut signal_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = args.next().context("--config requires a path")?;
            }
            "--account" => {
                account = Some(args.next().context("--account requires a name")?);
            }
            "--help" | "-h" => {
                println!(
                    "usage: signal-engine --account <name> [--config <path>] [signal.json]\n\
                     \n\
                     Reads a trade signal (JSON) from the given file or stdin and\n\
                     executes it against the named account."
                );
                std::process::exit(0);
            }
            other if !other.starts_with('-') => {
                signal_path = Some(other.to_string());
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(CliArgs {
        config_path,
        account: account.context("--account is required")?,
        signal_path,
    })
}

/// Read the signal JSON from a file, or stdin when no path is given.
fn read_signal(path: Option<&str>) -> anyhow::Result<TradeSignal> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading signal from {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading signal from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("parsing signal JSON")
}

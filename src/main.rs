#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use atpost::{Client, Config};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PREFIX: &str = "Test post via Rust ATProto client";

/// Used when `RUST_LOG` is unset; keeps warnings such as a missing `.env` visible.
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(env_filter()).init();
    atpost::load_dotenv();

    match post(std::env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // run() already printed its own failures to stdout
            if is_config_error(&err) {
                tracing::error!("{:#}", err);
            } else {
                tracing::debug!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn post(args: Vec<String>) -> Result<()> {
    let config = Config::from_env()?;
    let prefix = text_prefix(args);

    let client = Client::for_service(&config.service);
    atpost::run(&client, &config, &prefix, &mut std::io::stdout())
        .await
        .with_context(|| format!("failed to post as {}", config.handle))?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn text_prefix(args: Vec<String>) -> String {
    if args.is_empty() {
        DEFAULT_PREFIX.to_owned()
    } else {
        args.join(" ")
    }
}

fn is_config_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<atpost::Error>()
        .is_some_and(atpost::Error::is_config)
}

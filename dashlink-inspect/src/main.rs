//! dashlink layout inspector
//!
//! Operator tool for the locators a dashboard publishes:
//! 1. Decode a locator token into the layout it stands for
//! 2. Encode a layout file into a token
//! 3. List the per-unit fingerprints the engine diffs on
//!
//! Usage:
//!   dashlink-inspect --base-url http://host/jax decode <token>
//!   dashlink-inspect encode layout.json
//!   dashlink-inspect fingerprints --file layout.json

use std::{fs, io::Read, path::PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dashlink_inspect::{decode_layout, encode_layout, fingerprint_rows, render_rows};
use dashlink_sync::{CompressorConfig, HttpCompressor};
use dashlink_types::{LayoutState, LocatorToken};
use serde_json::Value;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "dashlink-inspect")]
#[command(about = "Decode, encode and fingerprint dashlink layout locators")]
struct Args {
    /// Base URL of the REST API hosting the compressor
    #[arg(long, env = "DASHLINK_COMPRESSOR_URL", default_value = "http://localhost:8080/jax")]
    base_url: String,

    /// Compressor dependencies declared for layout payloads
    #[arg(long = "dependency", default_value = "data")]
    dependencies: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layout stored under a token
    Decode {
        token: String,
    },
    /// Store a layout JSON file (or `-` for stdin) and print its token
    Encode {
        file: PathBuf,
    },
    /// Print the fingerprint of every unit of a layout
    Fingerprints {
        /// Token to resolve
        token: Option<String>,

        /// Read the layout from a JSON file instead
        #[arg(long, conflicts_with = "token")]
        file: Option<PathBuf>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let compressor = HttpCompressor::new(CompressorConfig {
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout,
    })
    .context("Failed to create compressor client")?;
    debug!("Using compressor at {}", compressor.config().base_url);

    match args.command {
        Command::Decode { token } => {
            let layout =
                decode_layout(&compressor, &LocatorToken::new(token), &args.dependencies).await?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        Command::Encode { file } => {
            let content = read_json(&file)?;
            let token = encode_layout(&compressor, content, &args.dependencies).await?;
            info!("Stored layout from {:?}", file);
            println!("{token}");
        }
        Command::Fingerprints { token, file, json } => {
            let layout = match (token, file) {
                (Some(token), None) => {
                    decode_layout(&compressor, &LocatorToken::new(token), &args.dependencies)
                        .await?
                }
                (None, Some(file)) => LayoutState::from_value(read_json(&file)?)
                    .with_context(|| format!("{:?} is not a layout", file))?,
                _ => bail!("Pass either a token or --file"),
            };
            let rows = fingerprint_rows(&layout)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_rows(&rows));
            }
        }
    }

    Ok(())
}

fn read_json(path: &PathBuf) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line front end that validates, encodes and decodes shareable levels.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xodex_core::{CodecError, Eigenstate, Limits};
use xodex_system_eigenstate::{decode_eigenstate, encode_eigenstate};
use xodex_system_level_codec::LevelCodec;
use xodex_system_seeding::{seed_from_token, SeededRng};
use xodex_system_validation::validate;

use self::config::Config;

mod config;
mod share;

/// Validate, encode and decode shareable puzzle levels.
#[derive(Debug, Parser)]
#[command(name = "xodex", version)]
struct Cli {
    /// Configuration file; `xodex.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize level JSON and print the result.
    Validate {
        /// Level JSON file, or `-` for stdin.
        input: PathBuf,
    },
    /// Encode level JSON into a token and share links.
    Encode {
        /// Level JSON file, or `-` for stdin.
        input: PathBuf,
    },
    /// Decode a token, fragment or share link into level JSON.
    Decode {
        /// Token, `#XDX1.` fragment or full share link.
        token: String,
    },
    /// Print the gameplay seed of a token and samples from its generator.
    Seed {
        /// Token, `#XDX1.` fragment or full share link.
        token: String,
        /// Number of generator values to print.
        #[arg(long, default_value_t = 0)]
        samples: usize,
    },
    /// Encode or decode eigenstate snapshots.
    #[command(subcommand)]
    Eigenstate(EigenstateCommand),
}

#[derive(Debug, Subcommand)]
enum EigenstateCommand {
    /// Encode eigenstate JSON into a token.
    Encode {
        /// Eigenstate JSON file, or `-` for stdin.
        input: PathBuf,
    },
    /// Decode an eigenstate token into JSON.
    Decode {
        /// Eigenstate token.
        token: String,
    },
}

/// Entry point for the Xodex command-line interface.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config);

    let codec = LevelCodec::new(Limits::STANDARD);
    match cli.command {
        Command::Validate { input } => {
            let raw = read_json(&input)?;
            let level = validate(&raw, codec.limits()).map_err(|reason| anyhow!(reason))?;
            println!("{}", serde_json::to_string_pretty(&level)?);
        }
        Command::Encode { input } => {
            let raw = read_json(&input)?;
            let token = codec.encode(&raw).map_err(rejected)?;
            info!(length = token.as_str().len(), "level encoded");
            println!("token: {token}");
            println!("fragment: #{}", token.share_fragment());
            if let Some(base) = &config.share.play_url {
                println!("play: {}", share::share_link(base, &token));
            }
            if let Some(base) = &config.share.editor_url {
                println!("edit: {}", share::share_link(base, &token));
            }
        }
        Command::Decode { token } => {
            let token = share::extract_token(&token).map_err(rejected)?;
            let level = codec.decode(token).map_err(rejected)?;
            println!("{}", serde_json::to_string_pretty(&level)?);
            println!("seed: {}", seed_from_token(token));
        }
        Command::Seed { token, samples } => {
            let token = share::extract_token(&token).map_err(rejected)?;
            let seed = seed_from_token(token);
            println!("seed: {seed}");
            let mut rng = SeededRng::new(seed);
            for _ in 0..samples {
                println!("{}", rng.next_unit());
            }
        }
        Command::Eigenstate(EigenstateCommand::Encode { input }) => {
            let state: Eigenstate = serde_json::from_value(read_json(&input)?)
                .context("eigenstate JSON must contain all six numeric fields")?;
            println!("{}", encode_eigenstate(&state).map_err(rejected)?);
        }
        Command::Eigenstate(EigenstateCommand::Decode { token }) => {
            let state = decode_eigenstate(token.trim()).map_err(rejected)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn read_json(input: &Path) -> Result<Value> {
    let contents = if input == Path::new("-") {
        let mut buffer = String::new();
        let _ = io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    serde_json::from_str(&contents).context("input is not valid JSON")
}

fn rejected(error: CodecError) -> anyhow::Error {
    let rejection = error.rejection();
    anyhow::Error::new(error).context(format!("{rejection:?} rejection"))
}

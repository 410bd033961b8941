// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # catapult-tx
//!
//! Entry point for the `catapult-tx` binary. Parses CLI arguments,
//! initializes logging, and runs one subcommand:
//!
//! - `encode` prints the unsigned payload of a transaction request
//! - `sign` signs it (and cosigns aggregates) into `SignedTransaction` JSON
//! - `hash` recomputes the hash of a signed payload
//! - `embed` prints the embedded aggregate form
//! - `cosign` signs an aggregate hash as a cosignatory
//! - `verify` checks a signed transaction against a network config
//! - `keygen` generates a key pair
//!
//! Results go to stdout; logs go to stderr.

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{CatapultCli, Commands};

fn main() -> Result<()> {
    let cli = CatapultCli::parse();
    logging::init_logging("catapult_tx=info,catapult_tx_cli=info", cli.log_format);

    let output = match &cli.command {
        Commands::Encode(args) => commands::encode(args)?,
        Commands::Sign(args) => commands::sign(args)?,
        Commands::Hash(args) => commands::hash(args)?,
        Commands::Embed(args) => commands::embed(args)?,
        Commands::Cosign(args) => commands::cosign(args)?,
        Commands::Verify(args) => commands::verify(args)?,
        Commands::Keygen(args) => commands::keygen(args)?,
    };
    println!("{output}");
    Ok(())
}

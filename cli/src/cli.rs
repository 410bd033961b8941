//! # CLI Interface
//!
//! Command-line structure for `catapult-tx` using `clap` derive. Every
//! command that needs network parameters reads them from a JSON
//! `NetworkConfig` file and lets individual flags override it.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use catapult_tx::crypto::DerivationScheme;
use catapult_tx::model::NetworkType;

use crate::logging::LogFormat;

/// Encode, sign and hash catapult-style transactions.
#[derive(Parser, Debug)]
#[command(
    name = "catapult-tx",
    about = "Encode, sign and hash catapult-style transactions",
    version,
    propagate_version = true
)]
pub struct CatapultCli {
    /// Log output format (logs go to stderr).
    #[arg(long, global = true, env = "CATAPULT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a transaction request into its unsigned canonical payload.
    Encode(EncodeArgs),
    /// Sign a transaction request, optionally with aggregate cosignatories.
    Sign(SignArgs),
    /// Compute the hash of a signed payload.
    Hash(HashArgs),
    /// Re-pack a transaction request into the embedded aggregate form.
    Embed(EmbedArgs),
    /// Cosign an aggregate by its hash.
    Cosign(CosignArgs),
    /// Check the signature and hash of a signed transaction.
    Verify(VerifyArgs),
    /// Generate a fresh key pair.
    Keygen(KeygenArgs),
}

/// Where network parameters come from.
#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// Network configuration file (JSON).
    #[arg(long, short = 'c', env = "CATAPULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Network, overriding the config file (e.g. `test_net`).
    #[arg(long, value_parser = parse_network)]
    pub network: Option<NetworkType>,

    /// Generation hash (64 hex characters), overriding the config file.
    #[arg(long, env = "CATAPULT_GENERATION_HASH")]
    pub generation_hash: Option<String>,

    /// Signature scheme, overriding the config file.
    #[arg(long, value_parser = parse_scheme)]
    pub scheme: Option<DerivationScheme>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Transaction request JSON; `-` reads stdin.
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Transaction request JSON; `-` reads stdin.
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,

    /// Hex private key of the signer.
    ///
    /// Prefer the environment variable over the flag; flags end up in
    /// shell history.
    #[arg(long, env = "CATAPULT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Hex private keys of aggregate cosignatories.
    #[arg(long = "cosigner-key")]
    pub cosigner_keys: Vec<String>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Signed payload hex.
    #[arg(long)]
    pub payload: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Transaction request JSON; `-` reads stdin.
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,

    /// Public key of the account the inner transaction is for.
    #[arg(long)]
    pub signer: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args, Debug)]
pub struct CosignArgs {
    /// Hash of the aggregate to cosign.
    #[arg(long)]
    pub hash: String,

    #[arg(long, env = "CATAPULT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[arg(long, value_parser = parse_scheme, default_value = "ed25519_sha3")]
    pub scheme: DerivationScheme,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed transaction JSON as printed by `sign`; `-` reads stdin.
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    #[arg(long, value_parser = parse_scheme, default_value = "ed25519_sha3")]
    pub scheme: DerivationScheme,
}

/// Parses a snake_case enum name the way the JSON config spells it.
fn parse_json_name<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

fn parse_network(s: &str) -> Result<NetworkType, String> {
    parse_json_name(s)
}

fn parse_scheme(s: &str) -> Result<DerivationScheme, String> {
    parse_json_name(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        CatapultCli::command().debug_assert();
    }

    #[test]
    fn parses_sign_with_cosigners() {
        let cli = CatapultCli::try_parse_from([
            "catapult-tx",
            "sign",
            "--input",
            "tx.json",
            "--private-key",
            "00",
            "--cosigner-key",
            "11",
            "--cosigner-key",
            "22",
            "--network",
            "mijin_test",
        ])
        .unwrap();
        match cli.command {
            Commands::Sign(args) => {
                assert_eq!(args.cosigner_keys, vec!["11", "22"]);
                assert_eq!(args.network.network, Some(NetworkType::MijinTest));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_network() {
        assert!(CatapultCli::try_parse_from([
            "catapult-tx",
            "hash",
            "--payload",
            "00",
            "--network",
            "moonnet",
        ])
        .is_err());
    }
}

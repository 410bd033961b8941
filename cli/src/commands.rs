//! Subcommand handlers.
//!
//! Each handler returns the text to print on stdout, so `main` stays a
//! dispatcher and the handlers can be tested without capturing output.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use catapult_tx::config::NetworkConfig;
use catapult_tx::crypto::{DerivationScheme, KeyPair, PublicKey, TransactionSigner};
use catapult_tx::model::{Hash256, Uint64};
use catapult_tx::transaction::{
    transaction_hash, CosignatureTransaction, SignedTransaction, Transaction, TransactionBody,
    TransactionBuilder,
};

use crate::cli::{
    CosignArgs, EmbedArgs, EncodeArgs, HashArgs, KeygenArgs, NetworkArgs, SignArgs, VerifyArgs,
};

/// What the CLI reads: a body plus optional header overrides.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub max_fee: Option<Uint64>,
    #[serde(default)]
    pub deadline_hours: Option<i64>,
    pub body: TransactionBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedKey {
    private_key: String,
    public_key: PublicKey,
    scheme: DerivationScheme,
}

#[derive(Debug, Serialize)]
struct Verification<'a> {
    hash: &'a str,
    cosignatures: usize,
    valid: bool,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Config file first, then flag overrides.
pub fn network_config(args: &NetworkArgs) -> Result<NetworkConfig> {
    let mut config = match &args.config {
        Some(path) => NetworkConfig::from_json(&read_input(path)?)
            .with_context(|| format!("invalid network config {}", path.display()))?,
        None => NetworkConfig {
            network_type: args
                .network
                .context("either --config or --network is required")?,
            generation_hash: String::new(),
            derivation_scheme: DerivationScheme::default(),
            fee_strategy: Default::default(),
            deadline_hours: catapult_tx::config::DEFAULT_DEADLINE_HOURS,
        },
    };
    if let Some(network) = args.network {
        config.network_type = network;
    }
    if let Some(hash) = &args.generation_hash {
        config.generation_hash = hash.clone();
    }
    if let Some(scheme) = args.scheme {
        config.derivation_scheme = scheme;
    }
    Ok(config)
}

fn generation_hash(config: &NetworkConfig) -> Result<[u8; 32]> {
    config
        .generation_hash_bytes()
        .context("a generation hash is required (config file or --generation-hash)")
}

pub fn build_transaction(request: TransactionRequest, config: &NetworkConfig) -> Result<Transaction> {
    let mut config = config.clone();
    if let Some(hours) = request.deadline_hours {
        config.deadline_hours = hours;
    }
    let mut builder = TransactionBuilder::from_config(&config)?;
    if let Some(fee) = request.max_fee {
        builder = builder.max_fee(fee);
    }
    Ok(builder.build(request.body)?)
}

fn load_transaction(input: &Path, network: &NetworkArgs) -> Result<(Transaction, NetworkConfig)> {
    let config = network_config(network)?;
    let request: TransactionRequest =
        serde_json::from_str(&read_input(input)?).context("invalid transaction request")?;
    let tx = build_transaction(request, &config)?;
    tracing::info!(
        transaction_type = %tx.transaction_type(),
        size = tx.calculate_size(),
        "loaded transaction request"
    );
    Ok((tx, config))
}

pub fn encode(args: &EncodeArgs) -> Result<String> {
    let (tx, _) = load_transaction(&args.input, &args.network)?;
    Ok(hex::encode_upper(tx.serialize()?))
}

pub fn sign(args: &SignArgs) -> Result<String> {
    let (tx, config) = load_transaction(&args.input, &args.network)?;
    let gen = generation_hash(&config)?;
    let key = KeyPair::from_hex(&args.private_key, config.derivation_scheme)
        .context("invalid private key")?;

    let signed = if args.cosigner_keys.is_empty() {
        tx.sign(&key, &gen)?
    } else {
        let cosigners = args
            .cosigner_keys
            .iter()
            .map(|k| KeyPair::from_hex(k, config.derivation_scheme))
            .collect::<Result<Vec<_>, _>>()
            .context("invalid cosigner key")?;
        let refs: Vec<&dyn TransactionSigner> =
            cosigners.iter().map(|k| k as &dyn TransactionSigner).collect();
        tx.sign_with_cosignatories(&key, &refs, &gen)?
    };
    Ok(serde_json::to_string_pretty(&signed)?)
}

pub fn hash(args: &HashArgs) -> Result<String> {
    let config = network_config(&args.network)?;
    let payload = hex::decode(args.payload.trim()).context("payload is not hex")?;
    let hash = transaction_hash(&payload, &generation_hash(&config)?)?;
    Ok(hex::encode_upper(hash))
}

pub fn embed(args: &EmbedArgs) -> Result<String> {
    let (tx, _) = load_transaction(&args.input, &args.network)?;
    let signer = PublicKey::from_hex(&args.signer).context("invalid signer public key")?;
    Ok(hex::encode_upper(tx.to_aggregate(&signer)?))
}

pub fn cosign(args: &CosignArgs) -> Result<String> {
    let parent = Hash256::from_hex(&args.hash)?;
    let key = KeyPair::from_hex(&args.private_key, args.scheme).context("invalid private key")?;
    let cosignature = CosignatureTransaction::new(parent).sign_with(&key)?;
    Ok(serde_json::to_string_pretty(&cosignature)?)
}

pub fn verify(args: &VerifyArgs) -> Result<String> {
    let config = network_config(&args.network)?;
    let signed: SignedTransaction =
        serde_json::from_str(&read_input(&args.input)?).context("invalid signed transaction")?;
    if signed.network_type != config.network_type {
        bail!(
            "transaction is for {}, config is for {}",
            signed.network_type,
            config.network_type
        );
    }
    signed.verify(&generation_hash(&config)?, config.derivation_scheme)?;

    let cosignatures = if signed.transaction_type.is_aggregate() {
        signed.verify_cosignatures(config.derivation_scheme)?;
        signed.cosignatures()?.len()
    } else {
        0
    };
    Ok(serde_json::to_string_pretty(&Verification {
        hash: &signed.hash,
        cosignatures,
        valid: true,
    })?)
}

pub fn keygen(args: &KeygenArgs) -> Result<String> {
    let key = KeyPair::generate(args.scheme);
    Ok(serde_json::to_string_pretty(&GeneratedKey {
        private_key: hex::encode_upper(key.secret_key_bytes()),
        public_key: key.public_key(),
        scheme: key.scheme(),
    })?)
}

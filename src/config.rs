//! Configuration management

use alloy::primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// anvil account 0
pub const DEFAULT_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

pub const DEFAULT_TRANSFER_AMOUNT: &str = "100000000000000";

/// How `/login` turns a proof into `transfer` call arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProverKind {
    /// Run `snarkjs generatecall` against per-request artifact files
    Snarkjs,
    /// Format the groth16 proof in process
    Native,
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rpc_url: String,
    pub private_key: String,
    pub contract_address: Address,
    pub transfer_amount: U256,
    pub prover: ProverKind,
    pub snarkjs_bin: String,
    pub artifacts_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contract_address = match lookup("MAIN_CONTRACT") {
            Some(address) => address
                .parse()
                .with_context(|| format!("Invalid MAIN_CONTRACT: {address}"))?,
            None => bail!("MAIN_CONTRACT is not set"),
        };

        let prover = match lookup("PROOF_FORMATTER").as_deref() {
            None | Some("snarkjs") => ProverKind::Snarkjs,
            Some("native") => ProverKind::Native,
            Some(other) => bail!("Invalid PROOF_FORMATTER: {other} (expected snarkjs or native)"),
        };

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            rpc_url: lookup("RPC").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),

            private_key: lookup("PK").unwrap_or_else(|| DEFAULT_PRIVATE_KEY.to_string()),

            contract_address,

            transfer_amount: lookup("TRANSFER_AMOUNT")
                .unwrap_or_else(|| DEFAULT_TRANSFER_AMOUNT.to_string())
                .parse()
                .context("Invalid TRANSFER_AMOUNT")?,

            prover,

            snarkjs_bin: lookup("SNARKJS_BIN").unwrap_or_else(|| "snarkjs".to_string()),

            artifacts_dir: lookup("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

// Keeps the signing key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("transfer_amount", &self.transfer_amount)
            .field("prover", &self.prover)
            .field("snarkjs_bin", &self.snarkjs_bin)
            .field("artifacts_dir", &self.artifacts_dir)
            .finish()
    }
}

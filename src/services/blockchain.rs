//! Chain client abstraction used by the handlers

use alloy::primitives::{keccak256, Address, TxHash, B256, U256};
use std::future::Future;
use thiserror::Error;

use crate::services::prover::CallArgs;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("{0}")]
    Rpc(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("invalid call arguments: {0}")]
    InvalidArguments(String),
}

/// Read and write access to the login contract.
///
/// Writes are split into submission and confirmation so callers decide when
/// to wait for inclusion.
pub trait ChainClient: Send + Sync + 'static {
    fn block_number(&self) -> impl Future<Output = Result<u64, ChainError>> + Send;

    fn is_user_registered(
        &self,
        login: B256,
    ) -> impl Future<Output = Result<bool, ChainError>> + Send;

    /// Submit `register(login, passwordHash)` and return the transaction hash.
    fn send_register(
        &self,
        login: B256,
        password_hash: U256,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Submit the proof-verifying `transfer` and return the transaction hash.
    fn send_transfer(
        &self,
        login: B256,
        args: &CallArgs,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Block until the transaction is included. A reverted receipt is an error.
    fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<(), ChainError>> + Send;
}

/// On-chain identifier for a login: keccak256 of its UTF-8 bytes.
pub fn hash_login(login: &str) -> B256 {
    keccak256(login.as_bytes())
}

/// Parse an address the way wallets accept them: optional `0x`, 40 hex
/// digits, and a valid EIP-55 checksum whenever the letters are mixed case.
pub fn parse_address(input: &str) -> Option<Address> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let address: Address = digits.parse().ok()?;

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *digits {
        return None;
    }

    Some(address)
}

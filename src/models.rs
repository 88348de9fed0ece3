//! Data models for API requests/responses

use alloy::primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A uint256 that clients may send as a JSON number, a decimal string or a
/// `0x` hex string.
///
/// JSON numbers are only accepted within the u64 range; larger values must be
/// sent as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(serde_json::Number),
    Text(String),
}

impl NumberLike {
    pub fn to_u256(&self) -> Option<U256> {
        match self {
            NumberLike::Number(n) => n.as_u64().map(U256::from),
            NumberLike::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub login: String,
    pub hashed_password: NumberLike,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login: String,
    pub recepient: String,
    pub proof: Value,
    pub public_signals: Vec<String>,
}

/// Returned by both `/register` and `/login`
#[derive(Debug, Clone, Serialize)]
pub struct TxResponse {
    pub tx: TxHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub is_user_registered: bool,
}

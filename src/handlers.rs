//! HTTP handlers for registration and proof-backed login

use alloy::primitives::U256;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::*;
use crate::services::blockchain::{hash_login, parse_address, ChainClient};
use crate::services::prover::ProofFormatter;

/// Shared application state
pub struct AppState<C> {
    pub chain: Arc<C>,
    pub prover: Arc<ProofFormatter>,
    pub transfer_amount: U256,
}

impl<C> AppState<C> {
    pub fn new(chain: C, prover: ProofFormatter, transfer_amount: U256) -> Self {
        Self {
            chain: Arc::new(chain),
            prover: Arc::new(prover),
            transfer_amount,
        }
    }
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            prover: Arc::clone(&self.prover),
            transfer_amount: self.transfer_amount,
        }
    }
}

/// Current block height
pub async fn block_number<C: ChainClient>(
    State(state): State<AppState<C>>,
) -> Result<String, AppError> {
    let block_number = state.chain.block_number().await?;
    Ok(format!("Current block number: {block_number}"))
}

/// Store a login hash and password hash on the contract
pub async fn register<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TxResponse>, AppError> {
    let password_hash = request
        .hashed_password
        .to_u256()
        .ok_or_else(|| AppError::BadRequest("hashedPassword is not a uint256".to_string()))?;

    let hashed_login = hash_login(&request.login);
    tracing::debug!(login = %request.login, hashed_login = %hashed_login, "register");

    if state.chain.is_user_registered(hashed_login).await? {
        return Err(AppError::AlreadyRegistered);
    }

    let tx = state.chain.send_register(hashed_login, password_hash).await?;
    state.chain.wait_for_receipt(tx).await?;

    tracing::info!(tx = %tx, hashed_login = %hashed_login, "user registered");
    Ok(Json(TxResponse { tx }))
}

pub async fn is_user_registered<C: ChainClient>(
    State(state): State<AppState<C>>,
    Path(login): Path<String>,
) -> Result<Json<RegistrationStatus>, AppError> {
    let is_user_registered = state.chain.is_user_registered(hash_login(&login)).await?;
    Ok(Json(RegistrationStatus { is_user_registered }))
}

/// Verify a login proof on-chain and pay out to the recipient
pub async fn login<C: ChainClient>(
    State(state): State<AppState<C>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TxResponse>, AppError> {
    let recipient = parse_address(&request.recepient).ok_or(AppError::InvalidRecipient)?;

    let hashed_login = hash_login(&request.login);
    tracing::debug!(
        login = %request.login,
        hashed_login = %hashed_login,
        recipient = %recipient,
        "login"
    );

    if !state.chain.is_user_registered(hashed_login).await? {
        return Err(AppError::NotRegistered);
    }

    let call = state
        .prover
        .generate_call(&request.proof, &request.public_signals)
        .await?;
    tracing::debug!(?call, "formatted verifier call");

    let tx = state
        .chain
        .send_transfer(hashed_login, &call, recipient, state.transfer_amount)
        .await?;
    state.chain.wait_for_receipt(tx).await?;

    tracing::info!(
        tx = %tx,
        hashed_login = %hashed_login,
        recipient = %recipient,
        "login transfer confirmed"
    );
    Ok(Json(TxResponse { tx }))
}

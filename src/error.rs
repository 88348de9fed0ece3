//! Error types for the relay server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::blockchain::ChainError;
use crate::services::prover::ProverError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already registered")]
    AlreadyRegistered,

    #[error("User is not registered")]
    NotRegistered,

    #[error("recepient is not valid address")]
    InvalidRecipient,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Prover(#[from] ProverError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AlreadyRegistered
            | AppError::NotRegistered
            | AppError::InvalidRecipient
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Chain(_) | AppError::Prover(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Clients get the raw message as plain text, chain and tool errors included.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

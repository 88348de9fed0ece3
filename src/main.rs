//! zkLogin Relay Server
//!
//! Registers login hashes on the login contract and relays proof-backed
//! logins that pay out to a recipient address.

use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod router;
mod services;

use config::Config;
use services::prover::ProofFormatter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zklogin_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting zkLogin Relay");
    tracing::info!("RPC: {}", config.rpc_url);
    tracing::info!("Contract: {}", config.contract_address);
    tracing::info!("Proof formatter: {:?}", config.prover);

    let chain = services::blockchain_alloy::connect(&config)?;
    let prover = ProofFormatter::from_config(&config);
    let state = handlers::AppState::new(chain, prover, config.transfer_amount);

    let app = router::create(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

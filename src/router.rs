//! HTTP router setup.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{self, AppState};
use crate::services::blockchain::ChainClient;

/// Create the application router.
pub fn create<C: ChainClient>(state: AppState<C>) -> Router {
    Router::new()
        .route("/", get(handlers::block_number::<C>))
        .route("/register", post(handlers::register::<C>))
        .route("/isUserRegistered/:login", get(handlers::is_user_registered::<C>))
        .route("/login", post(handlers::login::<C>))
        .with_state(state)
}

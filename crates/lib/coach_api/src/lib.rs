//! # coach_api
//!
//! HTTP API library for Growth Coach.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use coach_core::chatkit::{ChatKitClient, ChatKitError};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{growth_coach, health};

/// Largest accepted request body. Larger bodies get `413` with a JSON error.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream client; clones share one connection pool.
    pub chatkit: ChatKitClient,
}

impl AppState {
    /// Builds the state, creating the ChatKit client from `config.chatkit`.
    pub fn new(config: ApiConfig) -> Result<Self, ChatKitError> {
        let chatkit = ChatKitClient::new(&config.chatkit)?;
        Ok(Self { config, chatkit })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(
            routes::POST_API_GROWTH_COACH,
            post(growth_coach::growth_coach_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

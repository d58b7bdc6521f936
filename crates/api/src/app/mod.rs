//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repositories, dispatchers, demo data
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let jwt = Arc::new(storefront_auth::Hs256JwtValidator::new(
        config.jwt_secret.clone().into_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    let services = services::AppServices::in_memory();
    if config.seed_demo_data {
        if let Err(e) = services.seed_demo_data() {
            tracing::error!(error = %e, "failed to load demo data");
        }
    }

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(auth_state))
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services))))
}

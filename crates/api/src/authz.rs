//! API-side role guard, checked before any write is dispatched.
//!
//! Ownership of individual bundles and products is decided by the aggregates.

use axum::http::StatusCode;
use axum::response::Response;

use storefront_auth::require_seller;

use crate::app::errors;
use crate::context::PrincipalContext;

pub fn authorize_seller(principal: &PrincipalContext) -> Result<(), Response> {
    require_seller(&principal.principal())
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}

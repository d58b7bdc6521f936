//! Consistent JSON error responses: `{ "error": message, "code": code }`,
//! plus `"field"` for bundle validation failures.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use storefront_bundles::{BundleError, BundleValidationError};
use storefront_core::DomainError;
use storefront_infra::{DispatchError, RepositoryError};

/// Record kind named in not-found and ownership messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Bundle,
    Product,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Resource::Bundle => "bundle",
            Resource::Product => "product",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::Bundle => "Bundle not found",
            Resource::Product => "Product not found",
        }
    }
}

/// What the caller tried to do; only used to word ownership failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

pub fn not_found(resource: Resource) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", resource.not_found_message())
}

pub fn validation_error(err: BundleValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": err.to_string(),
            "code": "validation_error",
            "field": err.field().as_str(),
        })),
    )
        .into_response()
}

pub fn body_rejection(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn store_error(err: RepositoryError) -> Response {
    tracing::error!(error = %err, "repository failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn domain_error_to_response(err: DomainError, resource: Resource, action: Action) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => not_found(resource),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::NotOwner => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("Not authorized to {} this {}", action.verb(), resource.label()),
        ),
    }
}

fn rejection_or_response<E>(err: DispatchError<E>) -> Result<E, Response> {
    match err {
        DispatchError::Rejected(e) => Ok(e),
        DispatchError::Concurrency(msg) => Err(json_error(StatusCode::CONFLICT, "conflict", msg)),
        DispatchError::Store(msg) => {
            tracing::error!(error = %msg, "repository failure");
            Err(json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg))
        }
    }
}

pub fn bundle_dispatch_error(err: DispatchError<BundleError>, action: Action) -> Response {
    match rejection_or_response(err) {
        Ok(BundleError::Validation(v)) => validation_error(v),
        Ok(BundleError::Domain(d)) => domain_error_to_response(d, Resource::Bundle, action),
        Err(response) => response,
    }
}

pub fn product_dispatch_error(err: DispatchError<DomainError>, action: Action) -> Response {
    match rejection_or_response(err) {
        Ok(d) => domain_error_to_response(d, Resource::Product, action),
        Err(response) => response,
    }
}

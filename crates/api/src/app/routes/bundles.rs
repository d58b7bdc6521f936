use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;

use storefront_bundles::{
    BundleCommand, BundleId, BundleItem, CreateBundle, DeleteBundle, DiscountReport,
    UpdateBundle, distinct_items, price_and_validate,
};
use storefront_catalog::{ItemId, ProductId};
use storefront_core::AggregateId;
use storefront_infra::{Page, PageRequest};

use crate::app::dto::{self, BundleResponse};
use crate::app::errors::{self, Action, Resource};
use crate::app::routes::protected;
use crate::app::services::AppServices;
use crate::authz::authorize_seller;
use crate::context::PrincipalContext;
use crate::middleware::AuthState;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub fn router(auth: AuthState) -> Router {
    let public = Router::new()
        .route("/", get(list_bundles))
        .route("/preview", post(preview_bundle))
        .route("/:id", get(get_bundle))
        .route("/:id/checkDiscount", get(check_discount));

    let writes = Router::new()
        .route("/", post(create_bundle))
        .route("/:id", patch(update_bundle).delete(delete_bundle));

    public.merge(protected(writes, auth))
}

fn parse_bundle_id(raw: &str) -> Result<BundleId, Response> {
    raw.parse::<AggregateId>()
        .map(BundleId::new)
        .map_err(|_| errors::not_found(Resource::Bundle))
}

/// Turn request entries into bundle snapshots, looking up catalog references.
fn resolve_items(
    services: &AppServices,
    entries: Vec<dto::BundleProductEntry>,
) -> Result<Vec<BundleItem>, Response> {
    entries
        .into_iter()
        .map(|entry| match entry.price {
            Some(price) => Ok(BundleItem {
                id: ItemId::new(entry.id),
                name: entry.name.unwrap_or_default(),
                price,
                sale_price: entry.sale_price,
                image: entry.image,
                description: entry.description,
            }),
            None => {
                let product = match entry.id.parse::<AggregateId>() {
                    Ok(id) => services
                        .product_get(&ProductId::new(id))
                        .map_err(errors::store_error)?,
                    Err(_) => None,
                };
                product
                    .map(|product| BundleItem::from(&product))
                    .ok_or_else(|| {
                        errors::json_error(
                            StatusCode::BAD_REQUEST,
                            "unknown_product",
                            format!("Unknown product: {}", entry.id),
                        )
                    })
            }
        })
        .collect()
}

pub async fn list_bundles(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListBundlesQuery>,
) -> Response {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let bundles = match services.bundles_list(query.status.as_deref()) {
        Ok(bundles) => bundles,
        Err(e) => return errors::store_error(e),
    };
    let page = Page::from_items(bundles, request).map(|bundle| BundleResponse::from(&bundle));

    Json(dto::BundleListResponse {
        bundles: page.items,
        pagination: page.pagination,
    })
    .into_response()
}

pub async fn get_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let bundle_id = match parse_bundle_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.bundle_get(&bundle_id) {
        Ok(Some(bundle)) => Json(BundleResponse::from(&bundle)).into_response(),
        Ok(None) => errors::not_found(Resource::Bundle),
        Err(e) => errors::store_error(e),
    }
}

pub async fn check_discount(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let bundle_id = match parse_bundle_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.bundle_get(&bundle_id) {
        Ok(Some(bundle)) => Json(DiscountReport::for_bundle(&bundle)).into_response(),
        Ok(None) => errors::not_found(Resource::Bundle),
        Err(e) => errors::store_error(e),
    }
}

/// Validate and price a proposed bundle without storing it.
pub async fn preview_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateBundleRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::body_rejection(rejection),
    };

    let items = match resolve_items(&services, body.products.unwrap_or_default()) {
        Ok(items) => distinct_items(items),
        Err(resp) => return resp,
    };

    match price_and_validate(body.name.as_deref(), &items) {
        Ok(pricing) => Json(dto::PreviewResponse::new(pricing, items)).into_response(),
        Err(e) => errors::validation_error(e),
    }
}

pub async fn create_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateBundleRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::body_rejection(rejection),
    };

    let items = match resolve_items(&services, body.products.unwrap_or_default()) {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    let bundle_id = BundleId::new(AggregateId::new());
    let cmd = BundleCommand::CreateBundle(CreateBundle {
        bundle_id,
        seller_id: principal.user_id(),
        name: body.name,
        description: body.description,
        items,
        status: body.status,
        image: body.image,
        occurred_at: Utc::now(),
    });

    match services.dispatch_bundle(bundle_id, cmd) {
        Ok(bundle) => {
            tracing::info!(bundle_id = %bundle_id, seller_id = %principal.user_id(), "bundle created");
            (StatusCode::CREATED, Json(BundleResponse::from(&bundle))).into_response()
        }
        Err(e) => errors::bundle_dispatch_error(e, Action::Create),
    }
}

pub async fn update_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateBundleRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let bundle_id = match parse_bundle_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::body_rejection(rejection),
    };

    let items = match body.products {
        Some(entries) => match resolve_items(&services, entries) {
            Ok(items) => Some(items),
            Err(resp) => return resp,
        },
        None => None,
    };

    let cmd = BundleCommand::UpdateBundle(UpdateBundle {
        bundle_id,
        seller_id: principal.user_id(),
        name: body.name,
        description: body.description,
        items,
        status: body.status,
        image: body.image,
        occurred_at: Utc::now(),
    });

    match services.dispatch_bundle(bundle_id, cmd) {
        Ok(bundle) => {
            tracing::info!(bundle_id = %bundle_id, "bundle updated");
            Json(BundleResponse::from(&bundle)).into_response()
        }
        Err(e) => errors::bundle_dispatch_error(e, Action::Update),
    }
}

pub async fn delete_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let bundle_id = match parse_bundle_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = BundleCommand::DeleteBundle(DeleteBundle {
        bundle_id,
        seller_id: principal.user_id(),
        occurred_at: Utc::now(),
    });

    match services.dispatch_bundle(bundle_id, cmd) {
        Ok(_) => {
            tracing::info!(bundle_id = %bundle_id, "bundle deleted");
            Json(serde_json::json!({ "success": true })).into_response()
        }
        Err(e) => errors::bundle_dispatch_error(e, Action::Delete),
    }
}

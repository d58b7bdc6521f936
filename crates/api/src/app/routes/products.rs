use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;

use storefront_catalog::{CreateProduct, DeleteProduct, ProductCommand, ProductId, UpdateProduct};
use storefront_core::AggregateId;
use storefront_infra::{Page, PageRequest};

use crate::app::dto::{self, ProductResponse};
use crate::app::errors::{self, Action, Resource};
use crate::app::routes::protected;
use crate::app::services::AppServices;
use crate::authz::authorize_seller;
use crate::context::PrincipalContext;
use crate::middleware::AuthState;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

pub fn router(auth: AuthState) -> Router {
    let public = Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product));

    let writes = Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product));

    public.merge(protected(writes, auth))
}

fn parse_product_id(raw: &str) -> Result<ProductId, Response> {
    raw.parse::<AggregateId>()
        .map(ProductId::new)
        .map_err(|_| errors::not_found(Resource::Product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> Response {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let products = match services.products_list() {
        Ok(products) => products,
        Err(e) => return errors::store_error(e),
    };
    let page = Page::from_items(products, request).map(|product| ProductResponse::from(&product));

    Json(dto::ProductListResponse {
        products: page.items,
        pagination: page.pagination,
    })
    .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.product_get(&product_id) {
        Ok(Some(product)) => Json(ProductResponse::from(&product)).into_response(),
        Ok(None) => errors::not_found(Resource::Product),
        Err(e) => errors::store_error(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::body_rejection(rejection),
    };

    let product_id = ProductId::new(AggregateId::new());
    let cmd = ProductCommand::CreateProduct(CreateProduct {
        product_id,
        seller_id: principal.user_id(),
        name: body.name.unwrap_or_default(),
        price: body.price,
        sale_price: body.sale_price,
        description: body.description,
        image: body.image,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(product_id, cmd) {
        Ok(product) => {
            tracing::info!(product_id = %product_id, seller_id = %principal.user_id(), "product created");
            (StatusCode::CREATED, Json(ProductResponse::from(&product))).into_response()
        }
        Err(e) => errors::product_dispatch_error(e, Action::Create),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::body_rejection(rejection),
    };

    let cmd = ProductCommand::UpdateProduct(UpdateProduct {
        product_id,
        seller_id: principal.user_id(),
        name: body.name,
        price: body.price,
        sale_price: body.sale_price,
        description: body.description,
        image: body.image,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(product_id, cmd) {
        Ok(product) => {
            tracing::info!(product_id = %product_id, "product updated");
            Json(ProductResponse::from(&product)).into_response()
        }
        Err(e) => errors::product_dispatch_error(e, Action::Update),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = authorize_seller(&principal) {
        return resp;
    }
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = ProductCommand::DeleteProduct(DeleteProduct {
        product_id,
        seller_id: principal.user_id(),
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(product_id, cmd) {
        Ok(_) => {
            tracing::info!(product_id = %product_id, "product deleted");
            Json(serde_json::json!({ "success": true })).into_response()
        }
        Err(e) => errors::product_dispatch_error(e, Action::Delete),
    }
}

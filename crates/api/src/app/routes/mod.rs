use axum::{Router, routing::get};

use crate::middleware::{self, AuthState};

pub mod bundles;
pub mod products;
pub mod system;

/// Router for every endpoint except `/health`.
///
/// Reads are public; writes go through the bearer-token middleware.
pub fn router(auth: AuthState) -> Router {
    let whoami = Router::new().route("/whoami", get(system::whoami));

    Router::new()
        .merge(protected(whoami, auth.clone()))
        .nest("/bundles", bundles::router(auth.clone()))
        .nest("/products", products::router(auth))
}

/// Require a valid bearer token for every route already in `router`.
pub(crate) fn protected(router: Router, auth: AuthState) -> Router {
    router.route_layer(axum::middleware::from_fn_with_state(
        auth,
        middleware::auth_middleware,
    ))
}

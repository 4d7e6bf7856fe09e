use axum::{Router, middleware, routing::post};

use super::handlers::{recompute_company, recompute_trending};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/admin/companies/:slug/recompute", post(recompute_company))
        .route("/admin/trending/recompute", post(recompute_trending))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

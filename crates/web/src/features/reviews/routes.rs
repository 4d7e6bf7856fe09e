use axum::{
    Router, middleware,
    routing::{post, put},
};

use super::handlers::{moderate_review, submit_review};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/reviews/:review_id/status", put(moderate_review))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/companies/:slug/reviews", post(submit_review))
        .merge(protected)
}

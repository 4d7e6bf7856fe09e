use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    adjust_followers, create_company, get_company, get_score_history, list_companies,
    record_view, set_growth_rate,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/companies", post(create_company))
        .route("/companies/:slug/growth-rate", put(set_growth_rate))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies/:slug", get(get_company))
        .route("/companies/:slug/history", get(get_score_history))
        .route("/companies/:slug/views", post(record_view))
        .route("/companies/:slug/followers", post(adjust_followers))
        .merge(protected)
}

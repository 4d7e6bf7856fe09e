use axum::{Router, routing::post};

use super::handlers::analyze_text;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/analysis/text", post(analyze_text))
}

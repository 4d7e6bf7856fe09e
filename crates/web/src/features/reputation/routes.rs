use axum::{Router, routing::get};

use super::handlers::get_user_reputation;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/reputation", get(get_user_reputation))
}

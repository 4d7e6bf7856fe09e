use axum::{Router, routing::put};

use super::handlers::{retract_promise_vote, submit_promise_vote};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/:slug/promise-votes",
        put(submit_promise_vote).delete(retract_promise_vote),
    )
}

use axum::{
    Router,
    routing::{delete, put},
};

use super::handlers::{retract_vote, submit_vote};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/:slug/votes", put(submit_vote))
        .route("/companies/:slug/votes/:dimension", delete(retract_vote))
}

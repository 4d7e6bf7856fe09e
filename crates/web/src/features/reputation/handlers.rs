use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::reputation::ReputationResponse, services::reputation::get_reputation};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/reputation",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Reputation derived from the user's current activity", body = ReputationResponse)
    ),
    tag = "reputation"
)]
pub async fn get_user_reputation(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let profile = get_reputation(state.contributions.as_ref(), user_id).await?;

    Ok(Json(ReputationResponse::from(profile)).into_response())
}

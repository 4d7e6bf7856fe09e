use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::review::{ModerateReviewRequest, ReviewModerationResponse, SubmitReviewRequest},
    models::Review,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/companies/{slug}/reviews",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review stored as pending moderation", body = Review),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Company not found")
    ),
    tag = "reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<Response, WebError> {
    let company = state.companies.company_by_slug(&slug).await?;
    let review = state.writes.submit_review(company.company_id, req).await?;

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/reviews/{review_id}/status",
    params(
        ("review_id" = Uuid, Path, description = "Review ID")
    ),
    request_body = ModerateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Moderation status changed", body = ReviewModerationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn moderate_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(req): Json<ModerateReviewRequest>,
) -> Result<Response, WebError> {
    let response = state.writes.moderate_review(review_id, req.status).await?;

    Ok(Json(response).into_response())
}

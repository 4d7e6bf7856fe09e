use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::vote::{RetractVoteQuery, SubmitVoteRequest, VoteReceipt},
    models::Dimension,
};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/api/companies/{slug}/votes",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = SubmitVoteRequest,
    responses(
        (status = 200, description = "Vote stored; replaces the user's earlier vote on the dimension", body = VoteReceipt),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Company not found")
    ),
    tag = "votes"
)]
pub async fn submit_vote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SubmitVoteRequest>,
) -> Result<Response, WebError> {
    let company = state.companies.company_by_slug(&slug).await?;
    let receipt = state.writes.submit_vote(company.company_id, req).await?;

    Ok(Json(receipt).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/companies/{slug}/votes/{dimension}",
    params(
        ("slug" = String, Path, description = "Company slug"),
        ("dimension" = Dimension, Path, description = "Scored dimension"),
        RetractVoteQuery
    ),
    responses(
        (status = 200, description = "Vote removed", body = VoteReceipt),
        (status = 404, description = "Company or vote not found")
    ),
    tag = "votes"
)]
pub async fn retract_vote(
    State(state): State<AppState>,
    Path((slug, dimension)): Path<(String, Dimension)>,
    Query(query): Query<RetractVoteQuery>,
) -> Result<Response, WebError> {
    let company = state.companies.company_by_slug(&slug).await?;
    let receipt = state
        .writes
        .retract_vote(company.company_id, query.user_id, dimension)
        .await?;

    Ok(Json(receipt).into_response())
}

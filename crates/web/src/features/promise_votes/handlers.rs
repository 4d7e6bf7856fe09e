use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::promise_vote::{
    PromiseVoteReceipt, RetractPromiseVoteQuery, SubmitPromiseVoteRequest,
};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/api/companies/{slug}/promise-votes",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = SubmitPromiseVoteRequest,
    responses(
        (status = 200, description = "Promise vote stored", body = PromiseVoteReceipt),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Company not found")
    ),
    tag = "promise-votes"
)]
pub async fn submit_promise_vote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SubmitPromiseVoteRequest>,
) -> Result<Response, WebError> {
    let company = state.companies.company_by_slug(&slug).await?;
    let receipt = state
        .writes
        .submit_promise_vote(company.company_id, req)
        .await?;

    Ok(Json(receipt).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/companies/{slug}/promise-votes",
    params(
        ("slug" = String, Path, description = "Company slug"),
        RetractPromiseVoteQuery
    ),
    responses(
        (status = 200, description = "Promise vote removed", body = PromiseVoteReceipt),
        (status = 404, description = "Company or promise vote not found")
    ),
    tag = "promise-votes"
)]
pub async fn retract_promise_vote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<RetractPromiseVoteQuery>,
) -> Result<Response, WebError> {
    let company = state.companies.company_by_slug(&slug).await?;
    let receipt = state
        .writes
        .retract_promise_vote(company.company_id, query.user_id, &query.promise)
        .await?;

    Ok(Json(receipt).into_response())
}

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::company::{CompanyResponse, TrendingSweepResponse};

use crate::error::WebError;
use crate::features::companies::services::to_response;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/companies/{slug}/recompute",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Scores recomputed from current contributions", body = CompanyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Company not found"),
        (status = 503, description = "Recompute failed after every retry")
    ),
    tag = "admin"
)]
pub async fn recompute_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let company = services::recompute_company(&state, &slug).await?;

    Ok(Json(to_response(&state, company).await).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/trending/recompute",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Trending sweep finished", body = TrendingSweepResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn recompute_trending(State(state): State<AppState>) -> Result<Response, WebError> {
    let report = services::run_trending_sweep(&state).await?;

    Ok(Json(report).into_response())
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::{PaginatedResponse, PaginationParams},
    company::{
        AdjustFollowersRequest, CompanyResponse, CreateCompanyRequest, HistoryQuery,
        ScoreHistoryResponse, UpdateGrowthRateRequest,
    },
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/companies",
    params(PaginationParams),
    responses(
        (status = 200, description = "Companies ranked by overall score", body = PaginatedResponse<CompanyResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (companies, total_items) = services::list_companies(&state, &pagination).await?;

    let response = PaginatedResponse::new(
        companies,
        pagination.page,
        pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Company registered with neutral scores", body = CompanyResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let company = services::create_company(&state, req).await?;
    let response = services::to_response(&state, company).await;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/companies/{slug}",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    responses(
        (status = 200, description = "Company with its current scores", body = CompanyResponse),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let company = services::get_company(&state, &slug).await?;

    Ok(Json(services::to_response(&state, company).await).into_response())
}

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/history",
    params(
        ("slug" = String, Path, description = "Company slug"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Score history, newest first unless order=asc", body = Vec<ScoreHistoryResponse>),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn get_score_history(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, WebError> {
    let history = services::score_history(&state, &slug, query.order).await?;

    Ok(Json(history).into_response())
}

#[utoipa::path(
    post,
    path = "/api/companies/{slug}/views",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    responses(
        (status = 200, description = "View recorded", body = CompanyResponse),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn record_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let company = services::get_company(&state, &slug).await?;
    let company = state.companies.record_view(company.company_id).await?;

    Ok(Json(services::to_response(&state, company).await).into_response())
}

#[utoipa::path(
    post,
    path = "/api/companies/{slug}/followers",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = AdjustFollowersRequest,
    responses(
        (status = 200, description = "Follower count adjusted", body = CompanyResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn adjust_followers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<AdjustFollowersRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let company = services::get_company(&state, &slug).await?;
    let company = state
        .companies
        .adjust_followers(company.company_id, req.delta)
        .await?;

    Ok(Json(services::to_response(&state, company).await).into_response())
}

#[utoipa::path(
    put,
    path = "/api/companies/{slug}/growth-rate",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = UpdateGrowthRateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Growth rate updated", body = CompanyResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn set_growth_rate(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateGrowthRateRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let company = services::get_company(&state, &slug).await?;
    let company = state
        .companies
        .set_growth_rate(company.company_id, req.growth_rate)
        .await?;

    Ok(Json(services::to_response(&state, company).await).into_response())
}

use storage::{
    dto::{
        common::{PaginationParams, SortOrder},
        company::{CompanyResponse, CreateCompanyRequest, ScoreHistoryResponse},
    },
    error::Result,
    models::Company,
};

use crate::state::AppState;

/// Attach the aggregator's staleness flag to a company
pub async fn to_response(state: &AppState, company: Company) -> CompanyResponse {
    let stale = state.aggregator.is_stale(company.company_id).await;
    CompanyResponse::new(company, stale)
}

/// Ranked page of active companies
pub async fn list_companies(
    state: &AppState,
    pagination: &PaginationParams,
) -> Result<(Vec<CompanyResponse>, i64)> {
    let (companies, total) = state
        .companies
        .page_companies(pagination.offset(), pagination.limit())
        .await?;

    let mut responses = Vec::with_capacity(companies.len());
    for company in companies {
        responses.push(to_response(state, company).await);
    }

    Ok((responses, total))
}

pub async fn create_company(state: &AppState, request: CreateCompanyRequest) -> Result<Company> {
    let company = state
        .companies
        .create_company(request.into_new_company())
        .await?;

    tracing::info!(company_id = %company.company_id, slug = %company.slug, "Company registered");

    Ok(company)
}

pub async fn get_company(state: &AppState, slug: &str) -> Result<Company> {
    state.companies.company_by_slug(slug).await
}

pub async fn score_history(
    state: &AppState,
    slug: &str,
    order: SortOrder,
) -> Result<Vec<ScoreHistoryResponse>> {
    let company = state.companies.company_by_slug(slug).await?;
    let mut entries = state.companies.score_history(company.company_id).await?;

    if order == SortOrder::Desc {
        entries.reverse();
    }

    Ok(entries.into_iter().map(ScoreHistoryResponse::from).collect())
}

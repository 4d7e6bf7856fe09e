use chrono::Utc;
use storage::{
    dto::company::TrendingSweepResponse, models::Company, services::trending,
};

use crate::error::WebError;
use crate::state::AppState;

/// Recompute one company's scores, running the full retry schedule inline
pub async fn recompute_company(state: &AppState, slug: &str) -> Result<Company, WebError> {
    let company = state.companies.company_by_slug(slug).await?;
    let company = state.aggregator.recompute(company.company_id).await?;

    tracing::info!(company_id = %company.company_id, "Manual score recompute finished");

    Ok(company)
}

pub async fn run_trending_sweep(state: &AppState) -> Result<TrendingSweepResponse, WebError> {
    let report = trending::recompute_all_trending(state.companies.as_ref(), Utc::now()).await?;

    Ok(TrendingSweepResponse {
        updated: report.updated,
        failed: report.failed,
    })
}

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use storage::{
    dto::analysis::{AnalyzeTextRequest, TextAnalysisResponse},
    services::heuristics,
};
use validator::Validate;

use crate::error::WebError;

#[utoipa::path(
    post,
    path = "/api/analysis/text",
    request_body = AnalyzeTextRequest,
    responses(
        (status = 200, description = "Hype, ethics and sentiment scores for the text", body = TextAnalysisResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "analysis"
)]
pub async fn analyze_text(Json(req): Json<AnalyzeTextRequest>) -> Result<Response, WebError> {
    req.validate()?;

    let analysis = heuristics::analyze(&req.text);

    Ok(Json(TextAnalysisResponse::from(analysis)).into_response())
}

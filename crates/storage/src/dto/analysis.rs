use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::heuristics::{EthicsAssessment, TextAnalysis};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnalyzeTextRequest {
    #[validate(length(max = 50000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TextAnalysisResponse {
    pub hype_score: f64,
    pub ethics: EthicsAssessment,
    pub sentiment: Option<f64>,
}

impl From<TextAnalysis> for TextAnalysisResponse {
    fn from(analysis: TextAnalysis) -> Self {
        Self {
            hype_score: analysis.hype,
            ethics: analysis.ethics,
            sentiment: analysis.sentiment,
        }
    }
}

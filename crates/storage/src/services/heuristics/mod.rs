//! Stateless keyword scorers for free text.
//!
//! Hype and ethics scores share a 0.0–10.0 scale rounded to one decimal. Sentiment is a
//! signed ratio in [-1, 1]. All scorers are pure: identical input always yields identical
//! output.

pub mod ethics;
pub mod hype;
pub mod sentiment;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use ethics::{EthicsAssessment, EthicsScorer};
pub use hype::HypeScorer;
pub use sentiment::sentiment;

pub const SCALE_MIN: f64 = 0.0;
pub const SCALE_MAX: f64 = 10.0;
pub const SCALE_MIDPOINT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextAnalysis {
    pub hype: f64,
    pub ethics: EthicsAssessment,
    pub sentiment: Option<f64>,
}

pub fn analyze(text: &str) -> TextAnalysis {
    TextAnalysis {
        hype: HypeScorer::score(text),
        ethics: EthicsScorer::assess(text),
        sentiment: sentiment(text),
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn clamp_to_scale(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    rounded.clamp(SCALE_MIN, SCALE_MAX)
}

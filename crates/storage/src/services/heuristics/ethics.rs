use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SCALE_MIDPOINT, clamp_to_scale};

fn vocabulary(pattern: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{pattern})\b")).expect("ethics vocabulary is a valid pattern")
}

static PRIVACY_PROTECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    vocabulary(
        r"end[- ]to[- ]end encrypt(?:ed|ion)|encrypt(?:ed|ion|s)?|privacy[- ](?:first|preserving|by[- ]design)|data minimi[sz]ation|opt[- ]in|anonymi[sz](?:ed|ation)|gdpr[- ]compliant|do not sell|explicit consent|zero[- ]knowledge",
    )
});

static PRIVACY_VIOLATING: LazyLock<Regex> = LazyLock::new(|| {
    vocabulary(
        r"data breach(?:es)?|(?:sold|sells?|selling) (?:user |customer |personal )?data|tracking|surveillance|without (?:user |explicit )?consent|data leaks?|leaked data|spyware|third[- ]party sharing",
    )
});

static LABOR: LazyLock<Regex> = LazyLock::new(|| {
    vocabulary(
        r"mass layoffs?|layoffs?|laid off|union[- ]busting|sweatshops?|child labou?r|forced labou?r|unpaid overtime|wage theft|worker exploitation|labou?r violations?",
    )
});

static ENVIRONMENTAL: LazyLock<Regex> = LazyLock::new(|| {
    vocabulary(
        r"pollution|polluting|toxic waste|oil spills?|deforestation|carbon emissions|emissions violations?|greenwashing|contaminat(?:ed|ion)|illegal dumping",
    )
});

static SAFETY: LazyLock<Regex> = LazyLock::new(|| {
    vocabulary(
        r"recalls?|recalled|injur(?:y|ies|ed)|fatalit(?:y|ies)|safety (?:violations?|concerns?|hazards?|incidents?)|explosions?|defective|hazardous",
    )
});

const PRIVACY_CAP: usize = 3;
const PRIVACY_WEIGHT: f64 = 1.0;
const CATEGORY_BASE_PENALTY: f64 = 1.0;
const CATEGORY_EXTRA_PENALTY: f64 = 0.5;
const CATEGORY_MAX_PENALTY: f64 = 2.0;

/// Ethical-risk reading of a text, with the keyword hits behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EthicsAssessment {
    /// 0.0 (strong risk signal) to 10.0, 5.0 when nothing was flagged.
    pub score: f64,
    pub privacy_protective: usize,
    pub privacy_violating: usize,
    pub labor: usize,
    pub environmental: usize,
    pub safety: usize,
}

/// Scores the ethical-risk signal of a text around the midpoint of a 0.0–10.0 scale.
///
/// Privacy-protective language raises the score and privacy-violating language lowers it,
/// each capped at three hits. Labor, environmental and safety concerns are detected
/// independently; each category that fires lowers the score by 1.0 plus 0.5 per extra hit,
/// at most 2.0.
pub struct EthicsScorer;

impl EthicsScorer {
    pub fn score(text: &str) -> f64 {
        Self::assess(text).score
    }

    pub fn assess(text: &str) -> EthicsAssessment {
        let privacy_protective = PRIVACY_PROTECTIVE.find_iter(text).count();
        let privacy_violating = PRIVACY_VIOLATING.find_iter(text).count();
        let labor = LABOR.find_iter(text).count();
        let environmental = ENVIRONMENTAL.find_iter(text).count();
        let safety = SAFETY.find_iter(text).count();

        let privacy = privacy_protective.min(PRIVACY_CAP) as f64 * PRIVACY_WEIGHT
            - privacy_violating.min(PRIVACY_CAP) as f64 * PRIVACY_WEIGHT;
        let risk = category_penalty(labor)
            + category_penalty(environmental)
            + category_penalty(safety);

        EthicsAssessment {
            score: clamp_to_scale(SCALE_MIDPOINT + privacy - risk),
            privacy_protective,
            privacy_violating,
            labor,
            environmental,
            safety,
        }
    }
}

fn category_penalty(hits: usize) -> f64 {
    if hits == 0 {
        return 0.0;
    }
    (CATEGORY_BASE_PENALTY + CATEGORY_EXTRA_PENALTY * (hits - 1) as f64).min(CATEGORY_MAX_PENALTY)
}

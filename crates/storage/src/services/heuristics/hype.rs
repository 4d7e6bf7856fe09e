use std::sync::LazyLock;

use regex::Regex;

use super::{SCALE_MIN, clamp_to_scale, word_count};

static MARKETING_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(revolutionary|revolutioni[sz]e|game[- ]?chang(?:ing|er)|disruptive|groundbreaking|ground[- ]breaking|cutting[- ]edge|world[- ]class|best[- ]in[- ]class|industry[- ]leading|state[- ]of[- ]the[- ]art|next[- ]gen(?:eration)?|paradigm[- ]shift(?:ing)?|unprecedented|unparalleled|breakthrough|transformative|mind[- ]blowing|incredible|amazing|seamless(?:ly)?|synerg(?:y|ies)|10x|ultimate|magical)\b",
    )
    .expect("marketing vocabulary is a valid pattern")
});

const TERM_CAP: usize = 5;
const TERM_WEIGHT: f64 = 1.0;
const EXCLAMATION_CAP: usize = 3;
const EXCLAMATION_WEIGHT: f64 = 0.5;
const DENSITY_WEIGHT: f64 = 10.0;
const DENSITY_CAP: f64 = 3.5;

/// Scores marketing intensity of a text on 0.0–10.0.
///
/// Three bounded components add up to the maximum: marketing-term count (up to 5.0),
/// exclamation marks (up to 1.5, so a wall of `!!!!` cannot dominate) and the ratio of
/// marketing terms to words (up to 3.5).
pub struct HypeScorer;

impl HypeScorer {
    pub fn score(text: &str) -> f64 {
        let words = word_count(text);
        if words == 0 {
            return SCALE_MIN;
        }

        let hits = MARKETING_TERMS.find_iter(text).count();
        let exclamations = text.chars().filter(|c| *c == '!').count();

        let term_component = hits.min(TERM_CAP) as f64 * TERM_WEIGHT;
        let exclamation_component = exclamations.min(EXCLAMATION_CAP) as f64 * EXCLAMATION_WEIGHT;
        let density_component = (DENSITY_WEIGHT * hits as f64 / words as f64).min(DENSITY_CAP);

        clamp_to_scale(term_component + exclamation_component + density_component)
    }
}

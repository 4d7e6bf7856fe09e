const POSITIVE_TERMS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "positive",
    "growth",
    "profit",
    "success",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bad", "poor", "negative", "loss", "decline", "failure", "crisis",
];

/// Keyword sentiment of a news snippet in [-1, 1]; `None` when there is no text to judge.
///
/// Each vocabulary term counts once if it appears anywhere in the text (substring match),
/// and the balance is normalised by the number of words.
pub fn sentiment(text: &str) -> Option<f64> {
    let total_words = super::word_count(text);
    if total_words == 0 {
        return None;
    }

    let lowered = text.to_lowercase();
    let positive = POSITIVE_TERMS
        .iter()
        .filter(|term| lowered.contains(**term))
        .count() as f64;
    let negative = NEGATIVE_TERMS
        .iter()
        .filter(|term| lowered.contains(**term))
        .count() as f64;

    Some(((positive - negative) / total_words as f64).clamp(-1.0, 1.0))
}

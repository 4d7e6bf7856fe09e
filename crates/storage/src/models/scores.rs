use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dimension::{Dimension, NEUTRAL_SCORE};

/// The five per-dimension scores of a company plus their overall mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreSnapshot {
    pub ethics: Decimal,
    pub credibility: Decimal,
    pub delivery: Decimal,
    pub security: Decimal,
    pub innovation: Decimal,
    pub overall: Decimal,
}

impl ScoreSnapshot {
    /// Snapshot of a company nothing has contributed to yet.
    pub fn neutral() -> Self {
        Self {
            ethics: NEUTRAL_SCORE,
            credibility: NEUTRAL_SCORE,
            delivery: NEUTRAL_SCORE,
            security: NEUTRAL_SCORE,
            innovation: NEUTRAL_SCORE,
            overall: NEUTRAL_SCORE,
        }
    }

    pub fn dimension(&self, dimension: Dimension) -> Decimal {
        match dimension {
            Dimension::Ethics => self.ethics,
            Dimension::Credibility => self.credibility,
            Dimension::Delivery => self.delivery,
            Dimension::Security => self.security,
            Dimension::Innovation => self.innovation,
        }
    }

    pub fn from_dimensions(scores: [Decimal; 5], overall: Decimal) -> Self {
        let [ethics, credibility, delivery, security, innovation] = scores;
        Self {
            ethics,
            credibility,
            delivery,
            security,
            innovation,
            overall,
        }
    }
}

/// Running count and sum of the contributions to one dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionTally {
    pub count: i64,
    pub sum: i64,
}

/// Contributions to every dimension of one company, indexed by [`Dimension::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTallies {
    tallies: [DimensionTally; 5],
}

impl ScoreTallies {
    pub fn add(&mut self, dimension: Dimension, score: i16) {
        let tally = &mut self.tallies[dimension.index()];
        tally.count += 1;
        tally.sum += i64::from(score);
    }

    /// Merge a pre-aggregated tally, as returned by a `GROUP BY dimension` query.
    pub fn merge(&mut self, dimension: Dimension, count: i64, sum: i64) {
        let tally = &mut self.tallies[dimension.index()];
        tally.count += count;
        tally.sum += sum;
    }

    pub fn get(&self, dimension: Dimension) -> DimensionTally {
        self.tallies[dimension.index()]
    }
}

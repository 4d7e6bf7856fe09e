//! Trending score: a time-decayed, engagement-weighted popularity metric.
//!
//! Unlike dimension scores, trending is a batch metric. A periodic sweep recomputes it for
//! every company and writes only the trending fields, so it never contends with score
//! aggregation beyond ordinary row updates.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Company;
use crate::store::CompanyStore;

pub const TRENDING_MIN: f64 = 0.0;
pub const TRENDING_MAX: f64 = 100.0;

const RECENCY_WEIGHT: f64 = 0.3;
const ENGAGEMENT_WEIGHT: f64 = 0.7;
const RECENCY_HALF_LIFE_DAYS: f64 = 30.0;
const VIEW_WEIGHT: f64 = 0.1;
const REVIEW_WEIGHT: f64 = 2.0;
const FOLLOWER_WEIGHT: f64 = 0.5;
const GROWTH_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingInputs {
    pub view_count: i64,
    pub review_count: i64,
    pub follower_count: i64,
    /// Percentage; missing means zero.
    pub growth_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Company> for TrendingInputs {
    fn from(company: &Company) -> Self {
        Self {
            view_count: company.view_count,
            review_count: company.review_count,
            follower_count: company.follower_count,
            growth_rate: company.growth_rate.and_then(|rate| rate.to_f64()),
            created_at: company.created_at,
        }
    }
}

/// ```text
/// recency    = 100 / (1 + days_since_creation / 30)
/// engagement = views * 0.1 + reviews * 2 + followers * 0.5 + growth_rate * 10
/// trending   = clamp(recency * 0.3 + engagement * 0.7, 0, 100)
/// ```
///
/// A creation time in the future counts as zero days old.
pub fn trending_score(inputs: &TrendingInputs, now: DateTime<Utc>) -> f64 {
    let age_days = ((now - inputs.created_at).num_milliseconds() as f64 / 86_400_000.0).max(0.0);
    let recency = 100.0 / (1.0 + age_days / RECENCY_HALF_LIFE_DAYS);

    let engagement = inputs.view_count as f64 * VIEW_WEIGHT
        + inputs.review_count as f64 * REVIEW_WEIGHT
        + inputs.follower_count as f64 * FOLLOWER_WEIGHT
        + inputs.growth_rate.unwrap_or(0.0) * GROWTH_WEIGHT;

    let score = recency * RECENCY_WEIGHT + engagement * ENGAGEMENT_WEIGHT;
    if score.is_nan() {
        return TRENDING_MIN;
    }
    score.clamp(TRENDING_MIN, TRENDING_MAX)
}

/// Trending score as stored: two decimals.
pub fn trending_decimal(score: f64) -> Decimal {
    Decimal::from_f64(score)
        .map(|value| value.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub updated: usize,
    pub failed: Vec<Uuid>,
}

/// Recomputes trending for every active company. One company failing is logged and
/// reported but never stops the sweep.
pub async fn recompute_all_trending(
    store: &dyn CompanyStore,
    now: DateTime<Utc>,
) -> Result<SweepReport> {
    let companies = store.list_companies().await?;
    let mut report = SweepReport::default();

    for company in companies {
        let score = trending_decimal(trending_score(&TrendingInputs::from(&company), now));

        match store.update_trending(company.company_id, score, now).await {
            Ok(()) => report.updated += 1,
            Err(error) => {
                tracing::warn!(company_id = %company.company_id, %error, "Failed to update trending score");
                report.failed.push(company.company_id);
            }
        }
    }

    tracing::info!(
        updated = report.updated,
        failed = report.failed.len(),
        "Trending sweep finished"
    );

    Ok(report)
}

/// Runs the sweep every `interval`, starting immediately.
pub fn spawn_trending_sweep(store: Arc<dyn CompanyStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(error) = recompute_all_trending(store.as_ref(), Utc::now()).await {
                tracing::error!(%error, "Trending sweep could not list companies");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;

    fn inputs(created_at: DateTime<Utc>) -> TrendingInputs {
        TrendingInputs {
            view_count: 40,
            review_count: 3,
            follower_count: 10,
            growth_rate: Some(1.5),
            created_at,
        }
    }

    #[test]
    fn test_brand_new_company_without_engagement() {
        let now = Utc::now();
        let score = trending_score(
            &TrendingInputs {
                view_count: 0,
                review_count: 0,
                follower_count: 0,
                growth_rate: None,
                created_at: now,
            },
            now,
        );
        assert!((score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_formula_at_thirty_days() {
        let now = Utc::now();
        // recency 50 * 0.3 = 15; engagement (4 + 6 + 5 + 15) * 0.7 = 21
        let score = trending_score(&inputs(now - ChronoDuration::days(30)), now);
        assert!((score - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_newer_company_trends_higher() {
        let now = Utc::now();
        let recent = trending_score(&inputs(now - ChronoDuration::days(2)), now);
        let older = trending_score(&inputs(now - ChronoDuration::days(200)), now);
        assert!(recent > older);
    }

    #[test]
    fn test_bounds() {
        let now = Utc::now();
        let huge = TrendingInputs {
            view_count: i64::MAX / 2,
            review_count: 1_000_000,
            follower_count: 1_000_000,
            growth_rate: Some(900.0),
            created_at: now,
        };
        assert_eq!(trending_score(&huge, now), TRENDING_MAX);

        let collapsing = TrendingInputs {
            view_count: 0,
            review_count: 0,
            follower_count: 0,
            growth_rate: Some(-500.0),
            created_at: now - ChronoDuration::days(3650),
        };
        assert_eq!(trending_score(&collapsing, now), TRENDING_MIN);
    }

    #[test]
    fn test_future_creation_counts_as_new() {
        let now = Utc::now();
        let future = trending_score(&inputs(now + ChronoDuration::days(10)), now);
        let today = trending_score(&inputs(now), now);
        assert_eq!(future, today);
    }

    #[test]
    fn test_stored_precision() {
        assert_eq!(trending_decimal(36.004), Decimal::new(3600, 2));
        assert_eq!(trending_decimal(f64::NAN), Decimal::ZERO);
    }
}

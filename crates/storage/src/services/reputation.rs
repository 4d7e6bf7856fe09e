use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{ActivityCounts, UserProfile};
use crate::store::ContributionStore;

const VOTE_POINTS: i64 = 1;
const COMMENT_POINTS: i64 = 2;
const PROMISE_VOTE_POINTS: i64 = 3;

/// Reputation is derived from current activity totals only, so deleting activity lowers
/// it exactly as much as adding it raised it.
pub fn reputation_from_counts(counts: &ActivityCounts) -> i64 {
    let reputation = counts.votes * VOTE_POINTS
        + counts.commented_votes * COMMENT_POINTS
        + counts.promise_votes * PROMISE_VOTE_POINTS;

    reputation.max(0)
}

pub async fn recompute_reputation(
    store: &dyn ContributionStore,
    user_id: Uuid,
) -> Result<UserProfile> {
    let counts = store.activity_counts(user_id).await?;
    let reputation = reputation_from_counts(&counts);

    tracing::debug!(%user_id, reputation, ?counts, "Recomputed reputation");

    store.save_reputation(user_id, reputation).await
}

/// Stored reputation, computed on first access for users without a profile yet.
pub async fn get_reputation(store: &dyn ContributionStore, user_id: Uuid) -> Result<UserProfile> {
    match store.user_profile(user_id).await {
        Err(StorageError::NotFound) => recompute_reputation(store, user_id).await,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights() {
        let counts = ActivityCounts {
            votes: 4,
            commented_votes: 2,
            promise_votes: 1,
        };
        assert_eq!(reputation_from_counts(&counts), 4 + 4 + 3);
    }

    #[test]
    fn test_no_activity_is_zero() {
        assert_eq!(reputation_from_counts(&ActivityCounts::default()), 0);
    }

    #[test]
    fn test_never_negative() {
        let corrupted = ActivityCounts {
            votes: -5,
            commented_votes: 0,
            promise_votes: 0,
        };
        assert_eq!(reputation_from_counts(&corrupted), 0);
    }
}

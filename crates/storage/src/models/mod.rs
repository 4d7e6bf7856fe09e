pub mod company;
pub mod dimension;
pub mod promise_vote;
pub mod review;
pub mod score_history;
pub mod scores;
pub mod user_profile;
pub mod vote;

pub use company::{Company, NewCompany, VerificationTier};
pub use dimension::{Dimension, MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};
pub use promise_vote::{NewPromiseVote, PromiseVote};
pub use review::{DimensionRating, NewReview, Review, ReviewStatus, ReviewStatusChange};
pub use score_history::ScoreHistoryEntry;
pub use scores::{DimensionTally, ScoreSnapshot, ScoreTallies};
pub use user_profile::{ActivityCounts, UserProfile};
pub use vote::{NewVote, Vote, VoteChange};

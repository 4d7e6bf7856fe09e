use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::ScoreStatus;
use crate::models::{Dimension, DimensionRating, NewReview, Review, ReviewStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DimensionRatingInput {
    pub dimension: Dimension,

    #[validate(range(min = 0, max = 10, message = "Sub-rating must be between 0 and 10"))]
    pub score: i16,
}

/// Request payload for submitting a review; it starts out pending moderation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReviewRequest {
    pub user_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, max = 10000))]
    pub body: String,

    #[serde(default)]
    #[validate(nested, custom(function = "validate_unique_dimensions"))]
    pub ratings: Vec<DimensionRatingInput>,
}

fn validate_unique_dimensions(
    ratings: &Vec<DimensionRatingInput>,
) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    if ratings.iter().all(|rating| seen.insert(rating.dimension)) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("duplicate_dimension");
        error.message = Some("Each dimension may be rated at most once".into());
        Err(error)
    }
}

impl SubmitReviewRequest {
    pub fn into_new_review(self, company_id: Uuid) -> NewReview {
        NewReview {
            company_id,
            user_id: self.user_id,
            rating: self.rating,
            title: self.title,
            body: self.body,
            ratings: self
                .ratings
                .into_iter()
                .map(|input| DimensionRating {
                    dimension: input.dimension,
                    score: input.score,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerateReviewRequest {
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewModerationResponse {
    pub review: Review,
    pub previous_status: ReviewStatus,
    pub score_status: ScoreStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ratings: Vec<DimensionRatingInput>) -> SubmitReviewRequest {
        SubmitReviewRequest {
            user_id: Uuid::new_v4(),
            rating: 4,
            title: "Solid supplier".to_string(),
            body: "Shipped on time, clear privacy policy.".to_string(),
            ratings,
        }
    }

    #[test]
    fn test_duplicate_dimensions_rejected() {
        let duplicated = request(vec![
            DimensionRatingInput {
                dimension: Dimension::Ethics,
                score: 7,
            },
            DimensionRatingInput {
                dimension: Dimension::Ethics,
                score: 3,
            },
        ]);
        assert!(duplicated.validate().is_err());
    }

    #[test]
    fn test_sub_rating_range_checked() {
        let out_of_range = request(vec![DimensionRatingInput {
            dimension: Dimension::Security,
            score: 11,
        }]);
        assert!(out_of_range.validate().is_err());

        let valid = request(vec![DimensionRatingInput {
            dimension: Dimension::Security,
            score: 10,
        }]);
        assert!(valid.validate().is_ok());
    }
}

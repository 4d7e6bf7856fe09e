use sqlx::PgPool;
use uuid::Uuid;

use super::missing_reference;
use crate::error::{Result, StorageError};
use crate::models::{DimensionRating, NewReview, Review, ReviewStatus, ReviewStatusChange};

const REVIEW_COLUMNS: &str = r#"
    review_id, company_id, user_id, rating, title, body, status, created_at, updated_at
"#;

pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a review as pending together with its per-dimension ratings
    pub async fn create(&self, review: NewReview) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        let mut created = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (company_id, user_id, rating, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(review.company_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.body)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_reference)?;

        for rating in &review.ratings {
            sqlx::query(
                r#"
                INSERT INTO review_ratings (review_id, dimension, score)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(created.review_id)
            .bind(rating.dimension)
            .bind(rating.score)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut ratings = review.ratings;
        ratings.sort_by_key(|rating| rating.dimension);
        created.ratings = ratings;

        Ok(created)
    }

    pub async fn find_by_id(&self, review_id: Uuid) -> Result<Review> {
        let mut review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        review.ratings = self.ratings(review_id).await?;

        Ok(review)
    }

    /// Move a review to `status`, reporting the status it had before
    pub async fn set_status(
        &self,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<ReviewStatusChange> {
        let mut tx = self.pool.begin().await?;

        let previous = sqlx::query_scalar::<_, ReviewStatus>(
            "SELECT status FROM reviews WHERE review_id = $1 FOR UPDATE",
        )
        .bind(review_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            UPDATE reviews
            SET status = $2, updated_at = NOW()
            WHERE review_id = $1
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(review_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut review = review;
        review.ratings = self.ratings(review_id).await?;

        Ok(ReviewStatusChange { previous, review })
    }

    async fn ratings(&self, review_id: Uuid) -> Result<Vec<DimensionRating>> {
        let ratings = sqlx::query_as::<_, DimensionRating>(
            r#"
            SELECT dimension, score
            FROM review_ratings
            WHERE review_id = $1
            ORDER BY dimension
            "#,
        )
        .bind(review_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ratings)
    }
}

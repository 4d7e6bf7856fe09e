use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Company, Dimension, NewCompany, ScoreTallies};
use crate::services::aggregation::compute_snapshot;

pub(crate) const COMPANY_COLUMNS: &str = r#"
    company_id, name, slug,
    ethics_score, credibility_score, delivery_score, security_score, innovation_score,
    overall_score, review_count, view_count, follower_count, growth_rate, trending_score,
    verification_tier, is_active, created_at, scores_updated_at, trending_updated_at
"#;

#[derive(Debug, FromRow)]
struct TallyRow {
    dimension: Dimension,
    count: i64,
    sum: i64,
}

pub struct CompanyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company: NewCompany) -> Result<Company> {
        let created = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (name, slug, growth_rate, verification_tier)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(&company.name)
        .bind(&company.slug)
        .bind(company.growth_rate)
        .bind(company.verification_tier)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                StorageError::ConstraintViolation(format!(
                    "Company slug '{}' already exists",
                    company.slug
                ))
            } else {
                error
            }
        })?;

        Ok(created)
    }

    pub async fn find_by_id(&self, company_id: Uuid) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = $1"
        ))
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(company)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(company)
    }

    /// Active companies, oldest first
    pub async fn list_active(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE is_active
            ORDER BY created_at, company_id
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(companies)
    }

    /// Ranked page of active companies plus the total number of active companies
    pub async fn page(&self, offset: i64, limit: i64) -> Result<(Vec<Company>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE is_active")
            .fetch_one(self.pool)
            .await?;

        let companies = sqlx::query_as::<_, Company>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE is_active
            ORDER BY overall_score DESC, name
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok((companies, total))
    }

    pub async fn increment_views(&self, company_id: Uuid) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET view_count = view_count + 1
            WHERE company_id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(company)
    }

    pub async fn adjust_followers(&self, company_id: Uuid, delta: i64) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET follower_count = GREATEST(follower_count + $2, 0)
            WHERE company_id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(delta)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(company)
    }

    pub async fn set_growth_rate(
        &self,
        company_id: Uuid,
        growth_rate: Option<Decimal>,
    ) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET growth_rate = $2
            WHERE company_id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(growth_rate)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(company)
    }

    pub async fn update_trending(
        &self,
        company_id: Uuid,
        trending_score: Decimal,
        computed_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET trending_score = $2, trending_updated_at = $3
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .bind(trending_score)
        .bind(computed_at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Recompute all scores from current votes and approved review ratings, then append
    /// a history entry. The company row stays locked until commit, which serializes
    /// concurrent recomputations of the same company.
    pub async fn recompute_scores(&self, company_id: Uuid, reason: &str) -> Result<Company> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>(
            "SELECT company_id FROM companies WHERE company_id = $1 FOR UPDATE",
        )
        .bind(company_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let vote_rows = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT dimension, COUNT(*) AS count, COALESCE(SUM(score), 0)::BIGINT AS sum
            FROM votes
            WHERE company_id = $1
            GROUP BY dimension
            "#,
        )
        .bind(company_id)
        .fetch_all(&mut *tx)
        .await?;

        let rating_rows = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT rr.dimension, COUNT(*) AS count, COALESCE(SUM(rr.score), 0)::BIGINT AS sum
            FROM review_ratings rr
            JOIN reviews r ON r.review_id = rr.review_id
            WHERE r.company_id = $1 AND r.status = 'approved'
            GROUP BY rr.dimension
            "#,
        )
        .bind(company_id)
        .fetch_all(&mut *tx)
        .await?;

        let contributing: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM votes WHERE company_id = $1)
                 + (SELECT COUNT(*) FROM reviews WHERE company_id = $1 AND status = 'approved')
            "#,
        )
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut tallies = ScoreTallies::default();
        for row in vote_rows.iter().chain(rating_rows.iter()) {
            tallies.merge(row.dimension, row.count, row.sum);
        }
        let snapshot = compute_snapshot(&tallies);

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET ethics_score = $2, credibility_score = $3, delivery_score = $4,
                security_score = $5, innovation_score = $6, overall_score = $7,
                review_count = $8, scores_updated_at = NOW()
            WHERE company_id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(snapshot.ethics)
        .bind(snapshot.credibility)
        .bind(snapshot.delivery)
        .bind(snapshot.security)
        .bind(snapshot.innovation)
        .bind(snapshot.overall)
        .bind(contributing)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO score_history (
                company_id, ethics_score, credibility_score, delivery_score,
                security_score, innovation_score, overall_score, reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(company_id)
        .bind(snapshot.ethics)
        .bind(snapshot.credibility)
        .bind(snapshot.delivery)
        .bind(snapshot.security)
        .bind(snapshot.innovation)
        .bind(snapshot.overall)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(company)
    }
}

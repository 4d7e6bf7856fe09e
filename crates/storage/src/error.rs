use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Operation timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Concurrent-modification failures: serialization failure, deadlock, lock timeout.
    pub fn is_conflict(&self) -> bool {
        match self {
            StorageError::Conflict(_) => true,
            StorageError::Database(sqlx::Error::Database(e)) => {
                matches!(e.code().as_deref(), Some("40001" | "40P01" | "55P03"))
            }
            _ => false,
        }
    }

    /// Whether retrying the same operation later can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(_)) => self.is_conflict(),
            StorageError::Database(_)
            | StorageError::Conflict(_)
            | StorageError::Unavailable(_)
            | StorageError::Timeout => true,
            StorageError::Migration(_)
            | StorageError::NotFound
            | StorageError::ConstraintViolation(_)
            | StorageError::Validation(_) => false,
        }
    }
}

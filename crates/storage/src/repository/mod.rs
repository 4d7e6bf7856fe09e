pub mod company;
pub mod promise_vote;
pub mod reputation;
pub mod review;
pub mod score_history;
pub mod vote;

use crate::error::StorageError;

/// Inserting a row that references a missing company or review surfaces as `NotFound`.
pub(crate) fn missing_reference(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);
    if error.is_foreign_key_violation() {
        StorageError::NotFound
    } else {
        error
    }
}

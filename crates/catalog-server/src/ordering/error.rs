use super::Collection;

/// Errors raised by the ordering engine and its stores
#[derive(Debug, thiserror::Error)]
pub enum OrderingError {
    #[error("Unknown id(s) in reorder batch: {0:?}")]
    UnknownIds(Vec<i32>),

    #[error("Duplicate order value {0} in reorder batch")]
    DuplicateOrder(i32),

    #[error("Id {0} appears more than once in reorder batch")]
    DuplicateId(i32),

    #[error("Order value {0} is invalid: orders must be positive")]
    InvalidOrder(i32),

    #[error("Reorder batch has {len} entries, the maximum is {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Order conflict: {0}")]
    Conflict(String),

    #[error("Transaction could not complete, retry the request: {0}")]
    Retryable(String),

    #[error("Reorder transaction failed and was rolled back: {0}")]
    Transaction(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL SQLSTATE for `deadlock_detected`
const DEADLOCK_DETECTED: &str = "40P01";
/// PostgreSQL SQLSTATE for `serialization_failure`
const SERIALIZATION_FAILURE: &str = "40001";

impl OrderingError {
    /// Errors caused by the request itself rather than storage
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OrderingError::UnknownIds(_)
                | OrderingError::DuplicateOrder(_)
                | OrderingError::DuplicateId(_)
                | OrderingError::InvalidOrder(_)
                | OrderingError::BatchTooLarge { .. }
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderingError::Retryable(_))
    }

    /// Classify an error raised inside the reorder transaction
    ///
    /// Deadlocks and serialization failures are retryable; a unique
    /// violation means a target collided with a row outside the batch.
    pub fn from_reorder(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let code = db_err.code();
            if matches!(code.as_deref(), Some(DEADLOCK_DETECTED | SERIALIZATION_FAILURE)) {
                return OrderingError::Retryable(db_err.message().to_string());
            }
            if db_err.is_unique_violation() {
                return OrderingError::Transaction(
                    "a target order is already held by a row outside the batch".to_string(),
                );
            }
        }
        OrderingError::Database(err)
    }

    /// Classify an error raised by an insert that used
    /// `assign_next_order`; a unique violation there is a lost race
    pub fn from_insert(err: sqlx::Error, collection: Collection) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return OrderingError::Conflict(format!(
                    "order value in {} was taken concurrently, retry the request",
                    collection
                ));
            }
        }
        OrderingError::Database(err)
    }
}

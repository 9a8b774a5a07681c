use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing input. The caller can fix it and try again.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The operation would break a structural rule of the data model.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transaction, commit, constraint or I/O failure reported by the database.
    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// True for lock contention and pool exhaustion, where running the same
    /// operation again later can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Storage(DbErr::ConnectionAcquire(_)) => true,
            StoreError::Storage(DbErr::Conn(RuntimeErr::SqlxError(err)))
            | StoreError::Storage(DbErr::Exec(RuntimeErr::SqlxError(err)))
            | StoreError::Storage(DbErr::Query(RuntimeErr::SqlxError(err))) => err
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(is_busy_or_locked),
            _ => false,
        }
    }
}

// SQLITE_BUSY and SQLITE_LOCKED; extended codes keep the primary code in the low byte.
fn is_busy_or_locked(code: i32) -> bool {
    matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                format!("{field} ({})", codes.join(", "))
            })
            .collect::<Vec<_>>();
        StoreError::Validation(format!("invalid fields: {}", fields.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = StoreError::not_found("Category", 7);
        assert_eq!(err.to_string(), "Category with id 7 not found");
    }

    #[test]
    fn only_storage_errors_can_be_retryable() {
        assert!(!StoreError::validation("empty name").is_retryable());
        assert!(!StoreError::Conflict("has children".into()).is_retryable());
        assert!(!StoreError::Storage(DbErr::Custom("boom".into())).is_retryable());
    }

    #[test]
    fn busy_and_locked_codes_are_recognised() {
        assert!(is_busy_or_locked(5));
        assert!(is_busy_or_locked(6));
        assert!(is_busy_or_locked(517));
        assert!(!is_busy_or_locked(19));
        assert!(!is_busy_or_locked(1));
    }
}

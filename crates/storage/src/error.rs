use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

impl StorageError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Classify store-level check failures so callers see a rejected operation
    /// instead of an opaque database error.
    pub fn from_constraint(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = error {
            let constraint = db_err.constraint().unwrap_or("unnamed constraint");
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return StorageError::ConstraintViolation(format!(
                        "Duplicate value violates {constraint}"
                    ));
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return StorageError::ConstraintViolation(format!(
                        "Referenced row does not exist ({constraint})"
                    ));
                }
                Some(CHECK_VIOLATION) => {
                    return StorageError::ConstraintViolation(format!(
                        "Value rejected by {constraint}"
                    ));
                }
                _ => {}
            }
        }
        StorageError::from(error)
    }
}

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every way a service call can be refused
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is null or blank
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A business rule was broken
    #[error("{0}")]
    Validation(String),
    /// The row, or a row it references, does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// A unique key is already taken
    #[error("{0}")]
    Conflict(String),
    /// Other rows still depend on the one being removed
    #[error("{0}")]
    Dependency(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classifies a failed insert or update. The unique index is the source of
    /// truth for duplicates, so a violation here is a conflict even when the
    /// pre-check passed.
    pub fn from_write(err: DbErr, conflict: impl FnOnce() -> String) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(conflict()),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Validation(format!("a referenced row does not exist: {err}"))
            }
            _ => Self::Database(err),
        }
    }

    /// Classifies a failed delete
    pub fn from_delete(err: DbErr, entity: &'static str) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Dependency(format!("{entity} is still referenced by other records"))
            }
            _ => Self::Database(err),
        }
    }
}

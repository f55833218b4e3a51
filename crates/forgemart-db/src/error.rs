//! Database-specific error types and conversions.

use forgemart_core::error::CoreError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// A unique index rejected the write.
    #[error("Unique index violated on {entity}")]
    Conflict { entity: String },

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a store error for a write against `entity`,
    /// recognizing unique-index violations so callers can map them to
    /// `Conflict` instead of a generic database failure.
    pub(crate) fn from_write(err: surrealdb::Error, entity: &str) -> Self {
        if err.to_string().contains("already contains") {
            return DbError::Conflict {
                entity: entity.into(),
            };
        }
        DbError::Surreal(err)
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            DbError::Conflict { entity } => CoreError::Conflict { entity },
            other => CoreError::Database(other.to_string()),
        }
    }
}

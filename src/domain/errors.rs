use thiserror::Error;

/// Errors surfaced by the persistence gateway and query layer
///
/// A lookup that finds nothing is not an error: `find_by_id` returns
/// `Ok(None)` for an absent row.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Delete was invoked on an entity the current unit of work does not track
    #[error("entity is not managed by the current unit of work")]
    NotManaged,

    /// A store-level unique/foreign-key/not-null constraint rejected a write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An update matched zero rows; the row was removed out from under us.
    /// The caller must retry the whole unit of work.
    #[error("stale state: {0}")]
    StaleState(String),

    /// A member was associated with a team that has no identifier yet
    #[error("team must be saved before members can be assigned to it")]
    UnsavedTeam,

    /// Schema migration failed while bootstrapping the database
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let kind = db.kind();
            if matches!(
                kind,
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ) {
                return RepositoryError::ConstraintViolation(db.message().to_string());
            }
        }

        RepositoryError::Database(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DatabaseError {
    fn constraint_code(&self) -> Option<String> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => e.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.constraint_code().as_deref() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    }
}

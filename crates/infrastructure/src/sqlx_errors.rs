use ecoplaza_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a query failure to an application error.
///
/// Connection-level failures become [`AppError::Unavailable`] so callers can
/// tell an unreachable store from a bad query.
pub(crate) fn query_error(context: &str, error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::Unavailable(format!("{context}: {error}"))
        }
        other => AppError::Internal(format!("{context}: {other}")),
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    database_code(error).as_deref() == Some(UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    database_code(error).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

fn database_code(error: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().map(|code| code.into_owned());
    }

    None
}

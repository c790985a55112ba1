//! PostgreSQL SQLSTATE helpers for classifying constraint failures.

/// `foreign_key_violation`: a referenced row does not exist.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// `unique_violation`: a duplicate key (including primary keys).
pub const UNIQUE_VIOLATION: &str = "23505";

/// `check_violation`: a `CHECK` constraint rejected the row.
pub const CHECK_VIOLATION: &str = "23514";

/// Return the SQLSTATE code of a database error, if any.
pub fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// `true` when the error is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

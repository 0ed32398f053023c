use thiserror::Error;

/// Errors surfaced while establishing a destination connection.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("invalid destination url: {0}")]
    InvalidUrl(String),

    #[error("connection error: {0}")]
    Connection(#[from] tokio_postgres::Error),
}

/// Errors from the query/transaction layer once a connection is established.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("driver error: {0}")]
    Driver(#[from] tokio_postgres::Error),

    #[error("unknown error: {0}")]
    Unknown(String),
}

/// The constraint family a driver error falls into, used to decide bulk
/// insert fallback behavior without pattern-matching on SQLSTATE strings at
/// every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    PrimaryKeyViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckConstraintViolation,
    Other,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::PrimaryKeyViolation => "primary_key_violation",
            ErrorCategory::ForeignKeyViolation => "foreign_key_violation",
            ErrorCategory::NotNullViolation => "not_null_violation",
            ErrorCategory::CheckConstraintViolation => "check_constraint_violation",
            ErrorCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// A categorized constraint violation raised by the bulk insert strategy.
#[derive(Debug, Error)]
#[error("database constraint violated ({category}) on table '{table}': {source}")]
pub struct DatabaseConstraintError {
    pub category: ErrorCategory,
    pub table: String,
    #[source]
    pub source: tokio_postgres::Error,
}

/// Raised when both the fast path and the per-row fallback path of the bulk
/// insert strategy are exhausted without completing the batch.
#[derive(Debug, Error)]
#[error("bulk insert into '{table}' failed after {attempted} row(s): {source}")]
pub struct BulkInsertError {
    pub table: String,
    pub attempted: usize,
    #[source]
    pub source: tokio_postgres::Error,
}

/// Raised by the Migration Engine when a transaction rollback itself fails,
/// signalling the destination may be left in an inconsistent state.
#[derive(Debug, Error)]
#[error("transaction atomicity lost for app_id {app_id}: commit/rollback failed: {source}")]
pub struct TransactionAtomicityError {
    pub app_id: i64,
    #[source]
    pub source: tokio_postgres::Error,
}

/// Classifies a Postgres driver error by SQLSTATE into the category the
/// bulk insert strategy needs to decide "skip this row" vs. "fail the batch".
pub fn classify(error: &tokio_postgres::Error) -> ErrorCategory {
    use tokio_postgres::error::SqlState;

    let Some(db_error) = error.as_db_error() else {
        return ErrorCategory::Other;
    };

    match *db_error.code() {
        SqlState::UNIQUE_VIOLATION => ErrorCategory::PrimaryKeyViolation,
        SqlState::FOREIGN_KEY_VIOLATION => ErrorCategory::ForeignKeyViolation,
        SqlState::NOT_NULL_VIOLATION => ErrorCategory::NotNullViolation,
        SqlState::CHECK_VIOLATION => ErrorCategory::CheckConstraintViolation,
        _ => ErrorCategory::Other,
    }
}

/// Distinguishes errors a caller may sensibly retry (connection dropped,
/// timed out, admin shutdown) from everything else, so the migration layer
/// doesn't have to parse a driver error string to decide.
pub fn is_transient(error: &tokio_postgres::Error) -> bool {
    if error.is_closed() {
        return true;
    }
    error
        .as_db_error()
        .map(|e| e.code().code().starts_with("08"))
        .unwrap_or(false)
}

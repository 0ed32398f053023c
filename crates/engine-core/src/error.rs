use connectors::{BulkInsertError, DatabaseConstraintError, DbError, TransactionAtomicityError};
use thiserror::Error;

/// Everything that can fail while migrating one application's row set into
/// the destination.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to open transaction: {0}")]
    BeginTransaction(#[source] tokio_postgres::Error),

    #[error(transparent)]
    Constraint(#[from] DatabaseConstraintError),

    #[error(transparent)]
    BulkInsert(#[from] BulkInsertError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Atomicity(#[from] TransactionAtomicityError),
}

/// Errors from the local resumption checkpoint store. The checkpoint is an
/// optional accelerator; callers treat these as "fall back to the database
/// cursor" rather than fatal.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("failed to open checkpoint store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: sled::Error,
    },

    #[error("checkpoint store access failed: {0}")]
    Access(#[from] sled::Error),

    #[error("checkpoint serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

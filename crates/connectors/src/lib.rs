//! The destination driver: a PostgreSQL connection standing in for the
//! "standard SQL Server client driver with executemany-style bulk APIs"
//! named by the system this crate belongs to, plus the Bulk Insert
//! Strategy, the Duplicate Detector, and the staging-table reader that sit
//! directly on top of it.

pub mod bulk_insert;
pub mod connection;
pub mod duplicate;
pub mod error;
pub mod processing_log;
pub mod staging;
pub mod value;

pub use bulk_insert::{BulkInsertOptions, insert};
pub use connection::Destination;
pub use duplicate::{filter_new_rows, FilterResult};
pub use error::{
    BulkInsertError, ConnectorError, DatabaseConstraintError, DbError, ErrorCategory,
    TransactionAtomicityError,
};
pub use processing_log::write_log;
pub use staging::{get_work, StagingQuery};

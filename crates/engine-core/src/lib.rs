//! The Migration Engine: per-application transaction scoping around the
//! destination driver's duplicate detector and bulk insert strategy, a
//! run-wide metrics accumulator, and an optional local resumption
//! checkpoint that accelerates restart without replacing the destination's
//! processing log as the source of truth.

pub mod error;
pub mod metrics;
pub mod migration;
pub mod state;

pub use error::{MigrationError, StateStoreError};
pub use metrics::{Metrics, MetricsSnapshot};
pub use migration::{migrate_application, TableCounts};
pub use state::{
    models::{Checkpoint, Stage},
    SledStateStore, StateStore,
};

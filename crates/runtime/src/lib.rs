//! The runtime: wires the Parallel Coordinator's worker pool to the
//! Processor's batch-fetch loop, producing one [`RunSummary`] per run.

pub mod actor;
pub mod coordinator;
pub mod error;
pub mod messages;
pub mod processor;
pub mod spawn;
pub mod summary;
pub mod worker;

pub use actor::{Actor, ActorContext, ActorRef};
pub use coordinator::{partition_results, Coordinator};
pub use error::{ActorError, RunError};
pub use messages::{WorkResult, WorkStatus, WorkerMsg};
pub use processor::{Processor, ProcessorConfig};
pub use spawn::spawn_actor;
pub use summary::RunSummary;
pub use worker::{WorkerActor, APPLICATION_TIMEOUT};

use crate::error::StateStoreError;
use crate::state::models::Checkpoint;
use async_trait::async_trait;

pub mod models;
pub mod sled_store;

pub use sled_store::SledStateStore;

/// Local resumption checkpoint store. An optional accelerator over the
/// destination's `processing_log`, never the source of truth.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn save_checkpoint(&self, cp: &Checkpoint) -> Result<(), StateStoreError>;

    async fn load_checkpoint(
        &self,
        session_id: &str,
        partition_rem: u32,
    ) -> Result<Option<Checkpoint>, StateStoreError>;
}

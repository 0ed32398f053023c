use crate::error::StateStoreError;
use crate::state::{
    models::{Checkpoint, Stage},
    StateStore,
};
use async_trait::async_trait;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;

/// `sled`-backed implementation of [`StateStore`]. Single-file, embedded, no
/// server process — appropriate for the single-machine/single-instance
/// deployment this accelerator targets.
pub struct SledStateStore {
    db: sled::Db,
}

impl SledStateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateStoreError> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|source| StateStoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { db })
    }

    #[inline]
    fn key(session_id: &str, partition_rem: u32) -> String {
        format!("chk:{session_id}:{partition_rem}")
    }
}

#[async_trait]
impl StateStore for SledStateStore {
    async fn save_checkpoint(&self, cp: &Checkpoint) -> Result<(), StateStoreError> {
        let key = Self::key(&cp.session_id, cp.partition_rem);
        let new_bytes = bincode::serialize(cp)?;

        let result = self
            .db
            .transaction::<_, _, bincode::Error>(|tx_db| {
                if let Some(existing_bytes) = tx_db.get(&key)? {
                    let existing: Checkpoint = bincode::deserialize(&existing_bytes)
                        .map_err(|e| ConflictableTransactionError::Abort(e))?;

                    let should_update = if cp.last_app_id != existing.last_app_id {
                        cp.last_app_id > existing.last_app_id
                    } else {
                        cp.stage >= existing.stage
                    };

                    if !should_update {
                        return Ok(());
                    }
                }

                tx_db.insert(&*key, new_bytes.as_slice())?;
                Ok(())
            });

        match result {
            Ok(_) => Ok(()),
            Err(TransactionError::Abort(e)) => Err(StateStoreError::Serialization(e)),
            Err(TransactionError::Storage(e)) => Err(StateStoreError::Access(e)),
        }
    }

    async fn load_checkpoint(
        &self,
        session_id: &str,
        partition_rem: u32,
    ) -> Result<Option<Checkpoint>, StateStoreError> {
        let key = Self::key(session_id, partition_rem);
        match self.db.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn mk_cp(stage: Stage, last_app_id: i64) -> Checkpoint {
        Checkpoint {
            session_id: "session".into(),
            partition_rem: 0,
            stage,
            last_app_id,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn keeps_further_ahead_cursor_over_a_stale_write() {
        let dir = tempdir().unwrap();
        let store = SledStateStore::open(dir.path()).unwrap();

        store.save_checkpoint(&mk_cp(Stage::Committed, 500)).await.unwrap();
        store.save_checkpoint(&mk_cp(Stage::Read, 100)).await.unwrap();

        let cp = store.load_checkpoint("session", 0).await.unwrap().unwrap();
        assert_eq!(cp.last_app_id, 500);
    }

    #[tokio::test]
    async fn advances_when_stage_progresses_for_the_same_app_id() {
        let dir = tempdir().unwrap();
        let store = SledStateStore::open(dir.path()).unwrap();

        store.save_checkpoint(&mk_cp(Stage::Read, 100)).await.unwrap();
        store.save_checkpoint(&mk_cp(Stage::Committed, 100)).await.unwrap();

        let cp = store.load_checkpoint("session", 0).await.unwrap().unwrap();
        assert_eq!(cp.stage, Stage::Committed);
    }

    #[tokio::test]
    async fn missing_checkpoint_is_none() {
        let dir = tempdir().unwrap();
        let store = SledStateStore::open(dir.path()).unwrap();
        assert!(store.load_checkpoint("session", 0).await.unwrap().is_none());
    }
}

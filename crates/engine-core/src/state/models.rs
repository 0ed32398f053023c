use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally cached resumption position for one `(session_id, partition)`.
/// Purely an accelerator: the destination's `processing_log` is always the
/// authoritative source, this just saves a round trip deriving the starting
/// cursor from `NOT EXISTS` on every restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session_id: String,
    pub partition_rem: u32,
    pub stage: Stage,
    pub last_app_id: i64,
    pub updated_at: DateTime<Utc>,
}

/// Ranks how far a cursor position can be trusted: a position only
/// `committed` may be used to skip ahead; `read`/`mapped` positions describe
/// work that was picked up but not yet durably written to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Read,
    Mapped,
    Committed,
}

use thiserror::Error;

/// Errors internal to the actor mailbox mechanism.
#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor mailbox closed")]
    MailboxClosed,
}

/// Top-level error surfaced by the run loop. Most per-application failures
/// never reach this type — they're caught inside a worker and turned into a
/// `failed` processing-log row instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to connect destination: {0}")]
    Connect(#[from] connectors::ConnectorError),

    #[error("staging read failed: {0}")]
    Staging(#[from] connectors::DbError),

    #[error("coordinator actor unavailable: {0}")]
    Actor(#[from] ActorError),

    #[error("failed to write processing log: {0}")]
    LogWrite(#[source] connectors::DbError),
}

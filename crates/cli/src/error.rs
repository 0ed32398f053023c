use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read contract file: {0}")]
    ContractFileRead(#[from] std::io::Error),

    #[error("failed to load mapping contract: {0}")]
    ContractLoad(#[from] contract::ContractError),

    #[error("run failed: {0}")]
    Run(#[from] runtime::RunError),

    #[error("local state store error: {0}")]
    StateStore(#[from] engine_core::StateStoreError),

    #[error("failed to serialize run summary: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("shutdown requested")]
    ShutdownRequested,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

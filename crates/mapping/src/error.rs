use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("xml is not well-formed: {0}")]
    MalformedXml(String),

    #[error("app_id not found at '{xpath}'@{attribute}")]
    MissingAppId { xpath: String, attribute: String },

    #[error("app_id '{0}' is not a valid integer or is out of range")]
    InvalidAppId(String),
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("column '{table}.{column}' is required with no default and received no value")]
    RequiredColumnMissing { table: String, column: String },

    #[error("table '{0}' has no entry in the contract")]
    UnknownTable(String),
}

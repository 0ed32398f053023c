use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to parse contract document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("table '{table}' is listed in table_insertion_order but has no mappings")]
    EmptyTable { table: String },

    #[error("mapping for '{table}.{column}' references undefined enum '{enum_name}'")]
    DanglingEnum {
        table: String,
        column: String,
        enum_name: String,
    },

    #[error("filter rule for '{element}' references undefined enum '{enum_name}'")]
    DanglingFilterEnum { element: String, enum_name: String },

    #[error("table '{0}' has mappings but is missing from table_insertion_order")]
    UnorderedTable(String),

    #[error("key_identifiers.app_id_xpath is empty")]
    MissingAppIdXPath,
}

pub type Result<T> = std::result::Result<T, ContractError>;

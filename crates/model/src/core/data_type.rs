use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Destination column type, as declared by the contract's schema-derived
/// column metadata (`nullable`, `required`, `max_length`, `default_value`
/// all live alongside this in [`crate::contract::ColumnMeta`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Float,
    Boolean,
    Bit,
    Date,
    Timestamp,
    VarChar,
    Text,
    Json,
}

impl DataType {
    pub fn postgres_name(&self) -> Cow<'_, str> {
        match self {
            DataType::SmallInt => Cow::Borrowed("SMALLINT"),
            DataType::Int => Cow::Borrowed("INTEGER"),
            DataType::BigInt => Cow::Borrowed("BIGINT"),
            DataType::Decimal => Cow::Borrowed("DECIMAL"),
            DataType::Float => Cow::Borrowed("DOUBLE PRECISION"),
            DataType::Boolean => Cow::Borrowed("BOOLEAN"),
            DataType::Bit => Cow::Borrowed("SMALLINT"),
            DataType::Date => Cow::Borrowed("DATE"),
            DataType::Timestamp => Cow::Borrowed("TIMESTAMP"),
            DataType::VarChar => Cow::Borrowed("VARCHAR"),
            DataType::Text => Cow::Borrowed("TEXT"),
            DataType::Json => Cow::Borrowed("JSONB"),
        }
    }

    /// True for integer-family types that the mapping engine's
    /// `extract_numeric` / `numbers_only` chain steps should digit-extract
    /// raw non-numeric input into, per the mapping engine's `data_type`
    /// conversion rule.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::SmallInt | DataType::Int | DataType::BigInt)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.postgres_name())
    }
}

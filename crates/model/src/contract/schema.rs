use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema-derived column metadata the Contract Loader attaches to every
/// [`crate::contract::FieldMapping`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColumnMeta {
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub required: bool,
    pub max_length: Option<usize>,
    pub default_value: Option<Value>,
}

/// The category derived once at contract load time, as a closed enum rather
/// than dispatch on `target_table == "contact_base"`-style string
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableCategory {
    /// One row per application (e.g. the app root table).
    ApplicationRoot,
    /// One row per surviving (deduped, meaningful) contact.
    ContactScoped,
    /// One row per surviving address/employment element, inheriting its
    /// parent contact's id.
    ContactChild,
    /// Rows only ever appended by row-creating mapping types.
    Auxiliary,
}

/// A named map from string codes to integer codes, i.e. one entry of the
/// contract document's `enum_mappings`.
/// Lookups are case-insensitive; a missing key falls back to `default` if
/// set, otherwise yields "no value".
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnumMapping {
    values: HashMap<String, i64>,
    pub default: Option<i64>,
}

#[derive(Deserialize)]
struct RawEnumMapping {
    #[serde(default)]
    values: HashMap<String, i64>,
    #[serde(default)]
    default: Option<i64>,
}

impl<'de> Deserialize<'de> for EnumMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawEnumMapping::deserialize(deserializer)?;
        Ok(EnumMapping::new(raw.values, raw.default))
    }
}

impl EnumMapping {
    pub fn new(values: HashMap<String, i64>, default: Option<i64>) -> Self {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { values, default }
    }

    pub fn lookup(&self, key: &str) -> Option<i64> {
        self.values
            .get(&key.to_ascii_lowercase())
            .copied()
            .or(self.default)
    }
}

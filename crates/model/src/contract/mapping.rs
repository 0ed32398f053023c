use crate::core::{data_type::DataType, value::Value};
use serde::{Deserialize, Serialize};

/// One step of a mapping chain, as a closed enum rather than a free-form
/// mapping type string. `mapping_type` in the contract document may be a
/// single token
/// or an ordered list; both deserialize into `Vec<MappingStep>` via
/// [`FieldMapping`]'s custom deserializer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingStep {
    Enum { enum_name: String },
    CharToBit,
    NumbersOnly,
    ExtractNumeric,
    CalculatedField,
    LastValidPrimaryContact,
    LastValidSecondaryContact,
    CurrAddressOnly,
    DefaultGetUtcDateIfNull,
    AddScore { id: String },
    AddIndicator { name: String },
    AddHistory,
    AddReportLookup { src: Option<String> },
    PolicyExceptions { enum_name: Option<String> },
    WarrantyField { enum_name: String },
    AddCollateral { slot: u8 },
    IdentityInsert,
    ExtractDate,
}

impl MappingStep {
    /// Row-creating mapping types append rows to an auxiliary table rather
    /// than populating one column of the current row.
    pub fn is_row_creating(&self) -> bool {
        matches!(
            self,
            MappingStep::AddScore { .. }
                | MappingStep::AddIndicator { .. }
                | MappingStep::AddHistory
                | MappingStep::AddReportLookup { .. }
                | MappingStep::PolicyExceptions { .. }
                | MappingStep::WarrantyField { .. }
                | MappingStep::AddCollateral { .. }
        )
    }
}

/// One Field Mapping entry under a destination table. Covers both
/// scalar mappings (populate `target_column`) and row-creating mappings
/// (append to an auxiliary table) — the two are distinguished by whether
/// `mapping_type` contains a row-creating step, not by a separate enum
/// variant, matching how the contract document itself represents them
/// uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub xml_path: String,
    pub xml_attribute: Option<String>,
    pub target_column: String,
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    pub data_length: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_mapping_chain")]
    pub mapping_type: Vec<MappingStep>,
    pub enum_name: Option<String>,
    pub default_value: Option<Value>,
    pub expression: Option<String>,
}

fn default_data_type() -> DataType {
    DataType::VarChar
}

impl FieldMapping {
    pub fn is_row_creating(&self) -> bool {
        self.mapping_type.iter().any(MappingStep::is_row_creating)
    }
}

fn deserialize_mapping_chain<'de, D>(deserializer: D) -> Result<Vec<MappingStep>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(MappingStep),
        Many(Vec<MappingStep>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(step)) => vec![step],
        Some(OneOrMany::Many(steps)) => steps,
    })
}

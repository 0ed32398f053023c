//! Deserialization shapes for the on-disk contract document. `mapping_type`
//! is read as a raw `serde_json::Value` here (string or array of strings)
//! and resolved into typed [`model::contract::MappingStep`]s by
//! [`crate::syntax`] during loading, rather than via a custom `Deserialize`
//! impl on the typed structs.

use model::contract::{ColumnMeta, ElementKind, EnumMapping, RequiredAttribute, TableCategory};
use serde::Deserialize;
use serde_json::Value as Json;
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct RawDocument {
    pub target_schema: String,
    pub table_insertion_order: Vec<String>,
    pub tables: HashMap<String, RawTable>,
    #[serde(default)]
    pub enum_mappings: HashMap<String, EnumMapping>,
    #[serde(default)]
    pub element_filtering: HashMap<ElementKind, RawFilterRule>,
    pub key_identifiers: RawKeyIdentifiers,
}

#[derive(Deserialize)]
pub struct RawTable {
    pub category: TableCategory,
    #[serde(default)]
    pub mappings: Vec<RawFieldMapping>,
    #[serde(default)]
    pub columns: HashMap<String, ColumnMeta>,
}

#[derive(Deserialize)]
pub struct RawFieldMapping {
    pub xml_path: String,
    #[serde(default)]
    pub xml_attribute: Option<String>,
    pub target_column: String,
    #[serde(default)]
    pub data_type: Option<model::core::data_type::DataType>,
    #[serde(default)]
    pub data_length: Option<usize>,
    #[serde(default)]
    pub mapping_type: Json,
    #[serde(default)]
    pub enum_name: Option<String>,
    #[serde(default)]
    pub default_value: Option<model::core::value::Value>,
    #[serde(default)]
    pub expression: Option<String>,
}

#[derive(Deserialize)]
pub struct RawFilterRule {
    pub xpath: String,
    pub identity_attribute: String,
    #[serde(default)]
    pub required_attributes: Vec<RequiredAttribute>,
    pub type_attribute: String,
    #[serde(default)]
    pub priority_order: Vec<String>,
}

#[derive(Deserialize)]
pub struct RawKeyIdentifiers {
    pub app_id_xpath: String,
    pub app_id_attribute: String,
}

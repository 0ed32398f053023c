use crate::contract::{
    filter::{ElementKind, FilterRule},
    mapping::FieldMapping,
    schema::{ColumnMeta, EnumMapping, TableCategory},
};
use std::collections::HashMap;

/// The XPath + attribute name from which the application identifier is
/// read, i.e. `key_identifiers.app_id` in the contract document.
#[derive(Debug, Clone)]
pub struct KeyIdentifiers {
    pub app_id_xpath: String,
    pub app_id_attribute: String,
}

/// One destination table's worth of contract content: its category, its
/// field mappings, and its schema-derived column metadata.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub category: TableCategory,
    pub mappings: Vec<FieldMapping>,
    pub columns: HashMap<String, ColumnMeta>,
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

/// The immutable, versioned Mapping Contract. Built once by the
/// Contract Loader and shared (read-only, `Arc`-wrapped by callers) across
/// all workers for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Contract {
    pub target_schema: String,
    pub table_insertion_order: Vec<String>,
    pub tables: HashMap<String, TableSpec>,
    pub enum_mappings: HashMap<String, EnumMapping>,
    pub element_filtering: HashMap<ElementKind, FilterRule>,
    pub key_identifiers: KeyIdentifiers,
}

impl Contract {
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    pub fn enum_mapping(&self, name: &str) -> Option<&EnumMapping> {
        self.enum_mappings.get(name)
    }

    pub fn filter_rule(&self, kind: ElementKind) -> Option<&FilterRule> {
        self.element_filtering.get(&kind)
    }
}

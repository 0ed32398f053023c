use crate::{
    error::{ContractError, Result},
    raw::RawDocument,
    syntax,
};
use model::contract::{
    Contract, FieldMapping, KeyIdentifiers, MappingStep, TableSpec,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Reads a contract document into a validated, immutable [`Contract`].
/// Idempotent and thread-safe after construction: loading never mutates
/// shared state, and the returned `Contract` is plain owned data a caller
/// can wrap in `Arc` and hand to every worker.
pub struct ContractLoader;

impl ContractLoader {
    pub fn load(raw_json: &str) -> Result<Contract> {
        let raw: RawDocument = serde_json::from_str(raw_json)?;
        Self::build(raw)
    }

    fn build(raw: RawDocument) -> Result<Contract> {
        if raw.key_identifiers.app_id_xpath.trim().is_empty() {
            return Err(ContractError::MissingAppIdXPath);
        }

        let mut tables = HashMap::with_capacity(raw.tables.len());
        for (table_name, raw_table) in raw.tables {
            if raw_table.mappings.is_empty() {
                return Err(ContractError::EmptyTable { table: table_name });
            }
            let mut mappings = Vec::with_capacity(raw_table.mappings.len());
            for raw_mapping in raw_table.mappings {
                let chain = syntax::parse_chain(&raw_mapping.mapping_type)?;
                for step in &chain {
                    if let MappingStep::Enum { enum_name } = step {
                        if !raw.enum_mappings.contains_key(enum_name) {
                            return Err(ContractError::DanglingEnum {
                                table: table_name.clone(),
                                column: raw_mapping.target_column.clone(),
                                enum_name: enum_name.clone(),
                            });
                        }
                    }
                }
                if let Some(enum_name) = &raw_mapping.enum_name {
                    if !raw.enum_mappings.contains_key(enum_name) {
                        return Err(ContractError::DanglingEnum {
                            table: table_name.clone(),
                            column: raw_mapping.target_column.clone(),
                            enum_name: enum_name.clone(),
                        });
                    }
                }
                mappings.push(FieldMapping {
                    xml_path: raw_mapping.xml_path,
                    xml_attribute: raw_mapping.xml_attribute,
                    target_column: raw_mapping.target_column,
                    data_type: raw_mapping
                        .data_type
                        .unwrap_or(model::core::data_type::DataType::VarChar),
                    data_length: raw_mapping.data_length,
                    mapping_type: chain,
                    enum_name: raw_mapping.enum_name,
                    default_value: raw_mapping.default_value,
                    expression: raw_mapping.expression,
                });
            }

            tables.insert(
                table_name,
                TableSpec {
                    category: raw_table.category,
                    mappings,
                    columns: raw_table.columns,
                },
            );
        }

        for table_name in tables.keys() {
            if !raw.table_insertion_order.iter().any(|t| t == table_name) {
                return Err(ContractError::UnorderedTable(table_name.clone()));
            }
        }

        // priority_order entries are type-attribute values, not enum names,
        // so there's nothing here to cross-check against enum_mappings.
        let mut element_filtering = HashMap::with_capacity(raw.element_filtering.len());
        for (kind, rule) in raw.element_filtering {
            element_filtering.insert(
                kind,
                model::contract::FilterRule {
                    xpath: rule.xpath,
                    identity_attribute: rule.identity_attribute,
                    required_attributes: rule.required_attributes,
                    type_attribute: rule.type_attribute,
                    priority_order: rule.priority_order,
                },
            );
        }

        info!(
            tables = tables.len(),
            enums = raw.enum_mappings.len(),
            "contract loaded"
        );
        for table_name in &raw.table_insertion_order {
            if !tables.contains_key(table_name) {
                warn!(table = %table_name, "table_insertion_order entry has no matching table definition");
            }
        }

        Ok(Contract {
            target_schema: raw.target_schema,
            table_insertion_order: raw.table_insertion_order,
            tables,
            enum_mappings: raw.enum_mappings,
            element_filtering,
            key_identifiers: KeyIdentifiers {
                app_id_xpath: raw.key_identifiers.app_id_xpath,
                app_id_attribute: raw.key_identifiers.app_id_attribute,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> &'static str {
        r#"{
            "target_schema": "ins",
            "table_insertion_order": ["applications", "contacts"],
            "tables": {
                "applications": {
                    "category": "ApplicationRoot",
                    "mappings": [
                        {"xml_path": "/App", "xml_attribute": "id", "target_column": "app_id", "data_type": "Int"}
                    ],
                    "columns": {"app_id": {"nullable": false, "required": true}}
                },
                "contacts": {
                    "category": "ContactScoped",
                    "mappings": [
                        {"xml_path": "/App/Contact", "xml_attribute": "risk", "target_column": "risk_tier", "mapping_type": "enum(risk_tier)"}
                    ],
                    "columns": {}
                }
            },
            "enum_mappings": {
                "risk_tier": {"values": {"low": 1, "high": 2}, "default": 0}
            },
            "element_filtering": {},
            "key_identifiers": {"app_id_xpath": "/App", "app_id_attribute": "id"}
        }"#
    }

    #[test]
    fn loads_a_well_formed_contract() {
        let contract = ContractLoader::load(sample_doc()).unwrap();
        assert_eq!(contract.target_schema, "ins");
        assert!(contract.table("contacts").is_some());
        assert_eq!(
            contract.table("contacts").unwrap().mappings[0].mapping_type,
            vec![MappingStep::Enum {
                enum_name: "risk_tier".to_string()
            }]
        );
    }

    #[test]
    fn dangling_enum_reference_fails() {
        let doc = sample_doc().replace("enum(risk_tier)", "enum(nonexistent)");
        let err = ContractLoader::load(&doc).unwrap_err();
        assert!(matches!(err, ContractError::DanglingEnum { .. }));
    }

    #[test]
    fn table_missing_from_insertion_order_fails() {
        let doc = sample_doc().replace(
            r#""table_insertion_order": ["applications", "contacts"]"#,
            r#""table_insertion_order": ["applications"]"#,
        );
        let err = ContractLoader::load(&doc).unwrap_err();
        assert!(matches!(err, ContractError::UnorderedTable(_)));
    }

    #[test]
    fn empty_table_fails() {
        let doc = sample_doc().replace(
            r#""mappings": [
                        {"xml_path": "/App/Contact", "xml_attribute": "risk", "target_column": "risk_tier", "mapping_type": "enum(risk_tier)"}
                    ]"#,
            r#""mappings": []"#,
        );
        let err = ContractLoader::load(&doc).unwrap_err();
        assert!(matches!(err, ContractError::EmptyTable { .. }));
    }
}

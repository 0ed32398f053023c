use crate::{chain, context, error::MappingError, filter};
use expr::EvalContext;
use model::{
    contract::{Contract, ElementKind, FieldMapping, MappingStep, TableCategory, TableSpec},
    core::{data_type::DataType, identifiers::AppId, value::{FieldValue, Value}},
    records::row::{merge_row_set, RowData, RowSet},
};
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use tracing::{info, warn};

const MEANINGFUL_CONTACT_FIELDS: &[&str] = &["birth_date", "first_name", "last_name", "ssn"];

/// Given a parsed XML document, its application identifier, and a
/// contract, produces the `{table -> rows}` result obeying the data
/// model's invariants: per-application transaction scoping is the
/// caller's concern, not this module's — `apply_contract` is pure.
pub struct MappingEngine;

impl MappingEngine {
    pub fn apply_contract(
        app_id: AppId,
        doc: &Document,
        contract: &Contract,
    ) -> Result<RowSet, MappingError> {
        let root = doc.root_element();
        let mut ctx = context::build_root_context(&root);

        let contacts = contract
            .filter_rule(ElementKind::Contact)
            .map(|rule| filter::apply(doc, rule))
            .unwrap_or_default();
        let addresses = contract
            .filter_rule(ElementKind::Address)
            .map(|rule| filter::apply(doc, rule))
            .unwrap_or_default();
        let employment = contract
            .filter_rule(ElementKind::Employment)
            .map(|rule| filter::apply(doc, rule))
            .unwrap_or_default();

        let contact_rule = contract.filter_rule(ElementKind::Contact);
        let meaningful_contacts: Vec<Node> = contacts
            .into_iter()
            .filter(|c| {
                let ok = has_meaningful_field(c);
                if !ok {
                    warn!(app_id = %app_id, con_id = ?c.attribute("con_id"), "suppressed non-meaningful contact");
                }
                ok
            })
            .collect();

        if let (Some(rule), Some(primary_type)) =
            (contact_rule, contact_rule.and_then(|r| r.priority_order.first()))
        {
            if let Some(primary) = meaningful_contacts
                .iter()
                .find(|c| matches_type(c, rule, primary_type))
            {
                context::flatten_attributes(&mut ctx, primary, Some("contact"));
            }
            if let Some(secondary_type) = rule.priority_order.get(1) {
                if let Some(secondary) = meaningful_contacts
                    .iter()
                    .find(|c| matches_type(c, rule, secondary_type))
                {
                    context::flatten_attributes(&mut ctx, secondary, Some("secondary_contact"));
                }
            }
        }

        let mut rows = RowSet::new();

        for table_name in &contract.table_insertion_order {
            let Some(table_spec) = contract.table(table_name) else {
                continue;
            };

            match table_spec.category {
                TableCategory::ApplicationRoot => {
                    let table_rows = build_scalar_row(table_name, table_spec, None, &ctx, contract)?
                        .into_iter()
                        .collect::<Vec<_>>();
                    merge_row_set(&mut rows, table_name, table_rows);
                }
                TableCategory::ContactScoped => {
                    let mut table_rows = Vec::with_capacity(meaningful_contacts.len());
                    for contact in &meaningful_contacts {
                        let mut contact_ctx = ctx.clone();
                        context::flatten_attributes(&mut contact_ctx, contact, None);
                        if let Some(row) = build_scalar_row(
                            table_name,
                            table_spec,
                            Some(contact),
                            &contact_ctx,
                            contract,
                        )? {
                            table_rows.push(row);
                        }
                    }
                    merge_row_set(&mut rows, table_name, table_rows);
                }
                TableCategory::ContactChild => {
                    let source = child_source_for(table_name, &addresses, &employment);
                    let mut table_rows = Vec::with_capacity(source.len());
                    for element in source {
                        if !has_meaningful_field(element) {
                            continue;
                        }
                        let mut child_ctx = ctx.clone();
                        context::flatten_attributes(&mut child_ctx, element, None);
                        if let Some(row) = build_scalar_row(
                            table_name,
                            table_spec,
                            Some(element),
                            &child_ctx,
                            contract,
                        )? {
                            table_rows.push(row);
                        }
                    }
                    merge_row_set(&mut rows, table_name, table_rows);
                }
                TableCategory::Auxiliary => {
                    let table_rows = build_auxiliary_rows(doc, table_name, table_spec, app_id, &ctx, contract);
                    merge_row_set(&mut rows, table_name, table_rows);
                }
            }
        }

        info!(app_id = %app_id, tables = rows.len(), "mapping complete");
        Ok(rows)
    }
}

fn has_meaningful_field(node: &Node) -> bool {
    MEANINGFUL_CONTACT_FIELDS
        .iter()
        .any(|f| node.attribute(*f).map(|v| !v.trim().is_empty()).unwrap_or(false))
}

fn matches_type(node: &Node, rule: &model::contract::FilterRule, type_value: &str) -> bool {
    node.attribute(rule.type_attribute.as_str())
        .map(|v| v.eq_ignore_ascii_case(type_value))
        .unwrap_or(false)
}

/// Picks which filtered element set feeds a `ContactChild` table, inferred
/// from whether any of its mappings reference an address- or
/// employment-shaped XML path.
fn child_source_for<'a, 'i>(
    table_name: &str,
    addresses: &'a [Node<'a, 'i>],
    employment: &'a [Node<'a, 'i>],
) -> &'a [Node<'a, 'i>] {
    if table_name.to_ascii_lowercase().contains("employ") {
        employment
    } else {
        addresses
    }
}

fn build_scalar_row(
    table_name: &str,
    table_spec: &TableSpec,
    context_node: Option<&Node>,
    ctx: &EvalContext,
    contract: &Contract,
) -> Result<Option<RowData>, MappingError> {
    let mut row = RowData::new(table_name);

    for mapping in table_spec.mappings.iter().filter(|m| !m.is_row_creating()) {
        populate_column(&mut row, table_name, table_spec, mapping, context_node, ctx, contract)?;
    }

    if row.field_values.is_empty() {
        Ok(None)
    } else {
        Ok(Some(row))
    }
}

fn populate_column(
    row: &mut RowData,
    table_name: &str,
    table_spec: &TableSpec,
    mapping: &FieldMapping,
    context_node: Option<&Node>,
    ctx: &EvalContext,
    contract: &Contract,
) -> Result<(), MappingError> {
    let raw = extract_raw(context_node, mapping);
    let mut value = chain::apply_chain(
        raw,
        &mapping.mapping_type,
        mapping.expression.as_deref(),
        ctx,
        contract,
    );

    if matches!(value, None | Some(model::core::value::Value::Null)) {
        value = None;
    }

    let value = value.map(|v| chain::coerce(v, &mapping.data_type));
    let value = value.map(|v| chain::truncate(v, mapping.data_length, table_name, &mapping.target_column));

    match value {
        Some(v) => row.set(
            mapping.target_column.clone(),
            FieldValue::new(mapping.target_column.clone(), v, mapping.data_type.clone()),
        ),
        None => {
            let column_meta = table_spec.column(&mapping.target_column);
            let required = column_meta.map(|c| c.required).unwrap_or(false);
            let default = column_meta.and_then(|c| c.default_value.clone());

            match (required, default) {
                (false, _) => {}
                (true, Some(default_value)) => row.set(
                    mapping.target_column.clone(),
                    FieldValue::new(mapping.target_column.clone(), default_value, mapping.data_type.clone()),
                ),
                (true, None) => {
                    return Err(MappingError::RequiredColumnMissing {
                        table: table_name.to_string(),
                        column: mapping.target_column.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Reads the raw source value for one mapping: off the contextual element
/// directly for contact/address/employment-scoped tables (the current row
/// *is* that element), or left unset for application-scoped / calculated
/// fields, which draw from the flattened context instead.
fn extract_raw(context_node: Option<&Node>, mapping: &FieldMapping) -> Option<String> {
    let attribute = mapping.xml_attribute.as_deref()?;
    let node = context_node?;
    node.attribute(attribute).map(str::to_string)
}

/// Builds every row an Auxiliary table's row-creating mapping types append,
/// per §4.5.c. Each row-creating type has its own column set and row
/// cardinality rule, so this dispatches to one builder per type rather than
/// treating every mapping as an independent one-row-per-element producer.
fn build_auxiliary_rows(
    doc: &Document,
    table_name: &str,
    table_spec: &TableSpec,
    app_id: AppId,
    ctx: &EvalContext,
    contract: &Contract,
) -> Vec<RowData> {
    let mut rows = Vec::new();
    rows.extend(build_standalone_rows(doc, table_name, table_spec, app_id, ctx, contract));
    rows.extend(build_policy_exception_rows(doc, table_name, table_spec, app_id, ctx, contract));
    rows.extend(build_warranty_rows(doc, table_name, table_spec, app_id, ctx, contract));
    rows.extend(build_collateral_rows(doc, table_name, table_spec, app_id, ctx, contract));
    rows
}

fn new_aux_row(table_name: &str, app_id: AppId) -> RowData {
    let mut row = RowData::new(table_name);
    row.set("app_id", FieldValue::new("app_id", Value::Int(app_id.get()), DataType::BigInt));
    row
}

fn raw_attribute(element: &Node, mapping: &FieldMapping) -> Option<String> {
    mapping.xml_attribute.as_deref().and_then(|attr| element.attribute(attr)).map(str::to_string)
}

/// Runs a mapping's full chain and collapses "no value" and an explicit
/// `Value::Null` result to one `None`, matching the scalar-column rule in
/// `populate_column`.
fn chain_value(
    raw: Option<String>,
    mapping: &FieldMapping,
    ctx: &EvalContext,
    contract: &Contract,
) -> Option<Value> {
    match chain::apply_chain(raw, &mapping.mapping_type, mapping.expression.as_deref(), ctx, contract) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

/// `add_score`, `add_indicator`, `add_history`, `add_report_lookup`: each
/// mapping is self-contained (one element match produces one row), unlike
/// `policy_exceptions`/`warranty_field`/`add_collateral`, which group
/// several mappings' fields into one row per bucket or slot.
fn build_standalone_rows(
    doc: &Document,
    table_name: &str,
    table_spec: &TableSpec,
    app_id: AppId,
    ctx: &EvalContext,
    contract: &Contract,
) -> Vec<RowData> {
    let mut rows = Vec::new();

    for mapping in &table_spec.mappings {
        let Some(kind) = mapping.mapping_type.iter().find(|s| s.is_row_creating()) else {
            continue;
        };

        for element in crate::xpath::select(doc, &mapping.xml_path) {
            let raw = raw_attribute(&element, mapping);

            match kind {
                MappingStep::AddScore { id } => {
                    let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
                    let value = chain::coerce(value, &mapping.data_type);
                    if value.as_f64().is_none() {
                        continue;
                    }
                    let mut row = new_aux_row(table_name, app_id);
                    row.set(
                        "score_identifier",
                        FieldValue::new("score_identifier", Value::String(id.clone()), DataType::VarChar),
                    );
                    row.set("score", FieldValue::new("score", value, mapping.data_type.clone()));
                    rows.push(row);
                }
                MappingStep::AddIndicator { name } => {
                    let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
                    if !value.as_bool().unwrap_or(false) {
                        continue;
                    }
                    let mut row = new_aux_row(table_name, app_id);
                    row.set(
                        "indicator",
                        FieldValue::new("indicator", Value::String(name.clone()), DataType::VarChar),
                    );
                    row.set("value", FieldValue::new("value", Value::String("1".to_string()), DataType::VarChar));
                    rows.push(row);
                }
                MappingStep::AddHistory => {
                    let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
                    if value.is_empty_like() {
                        continue;
                    }
                    if matches!(value.as_string().map(|s| s.to_ascii_lowercase()).as_deref(), Some("null") | Some("none")) {
                        continue;
                    }
                    let value = chain::coerce(value, &mapping.data_type);
                    let name = mapping.xml_attribute.clone().unwrap_or_default();
                    let source = mapping.xml_path.rsplit('/').next().unwrap_or(&mapping.xml_path).to_string();

                    let mut row = new_aux_row(table_name, app_id);
                    row.set("name", FieldValue::new("name", Value::String(name), DataType::VarChar));
                    row.set("source", FieldValue::new("source", Value::String(source), DataType::VarChar));
                    row.set("value", FieldValue::new("value", value, mapping.data_type.clone()));
                    rows.push(row);
                }
                MappingStep::AddReportLookup { src } => {
                    let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
                    if value.is_empty_like() {
                        continue;
                    }
                    let value = chain::coerce(value, &mapping.data_type);
                    let name = mapping.xml_attribute.clone().unwrap_or_default();

                    let mut row = new_aux_row(table_name, app_id);
                    row.set("name", FieldValue::new("name", Value::String(name), DataType::VarChar));
                    row.set("value", FieldValue::new("value", value, mapping.data_type.clone()));
                    if let Some(src) = src {
                        row.set(
                            "source_report_key",
                            FieldValue::new("source_report_key", Value::String(src.clone()), DataType::VarChar),
                        );
                    }
                    rows.push(row);
                }
                _ => {}
            }
        }
    }

    rows
}

/// `policy_exceptions(enum?)`: a mapping whose parameter is `None` supplies
/// the shared `notes` text for every exception row in this table; each
/// mapping with `Some(enum_name)` contributes one row per matched element
/// when its value is meaningful.
fn build_policy_exception_rows(
    doc: &Document,
    table_name: &str,
    table_spec: &TableSpec,
    app_id: AppId,
    ctx: &EvalContext,
    contract: &Contract,
) -> Vec<RowData> {
    let notes_mapping = table_spec.mappings.iter().find(|m| {
        m.mapping_type
            .iter()
            .any(|s| matches!(s, MappingStep::PolicyExceptions { enum_name: None }))
    });
    let shared_notes = notes_mapping.and_then(|m| {
        let element = crate::xpath::select(doc, &m.xml_path).into_iter().next()?;
        let raw = raw_attribute(&element, m);
        chain_value(raw, m, ctx, contract).map(|v| chain::coerce(v, &m.data_type))
    });

    let mut rows = Vec::new();
    for mapping in &table_spec.mappings {
        let Some(enum_name) = mapping.mapping_type.iter().find_map(|s| match s {
            MappingStep::PolicyExceptions { enum_name: Some(e) } => Some(e),
            _ => None,
        }) else {
            continue;
        };

        for element in crate::xpath::select(doc, &mapping.xml_path) {
            let raw = raw_attribute(&element, mapping);
            let Some(reason_code) = chain_value(raw, mapping, ctx, contract) else { continue };
            if reason_code.is_empty_like() {
                continue;
            }
            let reason_code = chain::coerce(reason_code, &mapping.data_type);

            let mut row = new_aux_row(table_name, app_id);
            row.set(
                "policy_exception_type_enum",
                FieldValue::new("policy_exception_type_enum", Value::String(enum_name.clone()), DataType::VarChar),
            );
            row.set("reason_code", FieldValue::new("reason_code", reason_code, mapping.data_type.clone()));
            if let Some(notes) = &shared_notes {
                row.set("notes", FieldValue::new("notes", notes.clone(), DataType::VarChar));
            }
            rows.push(row);
        }
    }
    rows
}

const WARRANTY_VALUE_COLUMNS: &[&str] = &["company_name", "amount", "term_months", "policy_number"];
const WARRANTY_BIT_COLUMN: &str = "merrick_lienholder_flag";

/// `warranty_field(enum)`: every mapping sharing the same `enum_name`
/// bucket contributes one column to a single row for that bucket; the bit
/// flag column defaults to `0` when no mapping in the bucket sets it.
fn build_warranty_rows(
    doc: &Document,
    table_name: &str,
    table_spec: &TableSpec,
    app_id: AppId,
    ctx: &EvalContext,
    contract: &Contract,
) -> Vec<RowData> {
    let mut buckets: BTreeMap<String, RowData> = BTreeMap::new();

    for mapping in &table_spec.mappings {
        let Some(enum_name) = mapping.mapping_type.iter().find_map(|s| match s {
            MappingStep::WarrantyField { enum_name } => Some(enum_name),
            _ => None,
        }) else {
            continue;
        };

        let Some(element) = crate::xpath::select(doc, &mapping.xml_path).into_iter().next() else {
            continue;
        };
        let raw = raw_attribute(&element, mapping);
        let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
        let value = chain::coerce(value, &mapping.data_type);

        let row = buckets
            .entry(enum_name.clone())
            .or_insert_with(|| new_aux_row(table_name, app_id));
        row.set(
            mapping.target_column.clone(),
            FieldValue::new(mapping.target_column.clone(), value, mapping.data_type.clone()),
        );
    }

    buckets
        .into_values()
        .filter(|row| row.has_any_meaningful(WARRANTY_VALUE_COLUMNS))
        .map(|mut row| {
            if !row.has_column(WARRANTY_BIT_COLUMN) {
                row.set(
                    WARRANTY_BIT_COLUMN,
                    FieldValue::new(WARRANTY_BIT_COLUMN, Value::Boolean(false), DataType::Boolean),
                );
            }
            row
        })
        .collect()
}

/// `add_collateral(slot)`: every mapping sharing the same `slot` (1..4)
/// contributes one column to that slot's row — including `calculated_field`
/// / `char_to_bit` / `numbers_only` mappings, which populate a field of the
/// slot's row without themselves gating whether the row gets created.
/// `sort_order` is the slot number; a missing NOT NULL column is filled
/// from the contract's `default_value`.
fn build_collateral_rows(
    doc: &Document,
    table_name: &str,
    table_spec: &TableSpec,
    app_id: AppId,
    ctx: &EvalContext,
    contract: &Contract,
) -> Vec<RowData> {
    let mut buckets: BTreeMap<u8, RowData> = BTreeMap::new();
    let mut value_columns: Vec<String> = Vec::new();

    for mapping in &table_spec.mappings {
        let Some(slot) = mapping.mapping_type.iter().find_map(|s| match s {
            MappingStep::AddCollateral { slot } => Some(*slot),
            _ => None,
        }) else {
            continue;
        };
        if !(1..=4).contains(&slot) {
            continue;
        }
        value_columns.push(mapping.target_column.clone());

        let Some(element) = crate::xpath::select(doc, &mapping.xml_path).into_iter().next() else {
            continue;
        };
        let raw = raw_attribute(&element, mapping);
        let Some(value) = chain_value(raw, mapping, ctx, contract) else { continue };
        let value = chain::coerce(value, &mapping.data_type);
        let value = chain::truncate(value, mapping.data_length, table_name, &mapping.target_column);

        let row = buckets.entry(slot).or_insert_with(|| {
            let mut row = new_aux_row(table_name, app_id);
            row.set("sort_order", FieldValue::new("sort_order", Value::Int(slot as i64), DataType::SmallInt));
            row
        });
        row.set(
            mapping.target_column.clone(),
            FieldValue::new(mapping.target_column.clone(), value, mapping.data_type.clone()),
        );
    }

    for row in buckets.values_mut() {
        for column in &value_columns {
            if row.has_column(column) {
                continue;
            }
            let Some(meta) = table_spec.column(column) else { continue };
            if !meta.required {
                continue;
            }
            if let Some(default) = &meta.default_value {
                let data_type = table_spec
                    .mappings
                    .iter()
                    .find(|m| &m.target_column == column)
                    .map(|m| m.data_type.clone())
                    .unwrap_or(DataType::VarChar);
                row.set(column.clone(), FieldValue::new(column.clone(), default.clone(), data_type));
            }
        }
    }

    let value_column_refs: Vec<&str> = value_columns.iter().map(String::as_str).collect();
    buckets
        .into_values()
        .filter(|row| row.has_any_meaningful(&value_column_refs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract::ContractLoader;

    fn contract() -> Contract {
        ContractLoader::load(
            r#"{
            "target_schema": "ins",
            "table_insertion_order": ["applications", "contacts"],
            "tables": {
                "applications": {
                    "category": "ApplicationRoot",
                    "mappings": [
                        {"xml_path": "/App", "xml_attribute": "id", "target_column": "app_id", "data_type": "Int"}
                    ],
                    "columns": {}
                },
                "contacts": {
                    "category": "ContactScoped",
                    "mappings": [
                        {"xml_path": "/App/Contacts/Contact", "xml_attribute": "first_name", "target_column": "first_name"}
                    ],
                    "columns": {}
                }
            },
            "enum_mappings": {},
            "element_filtering": {
                "contact": {
                    "xpath": "/App/Contacts/Contact",
                    "identity_attribute": "con_id",
                    "required_attributes": [],
                    "type_attribute": "type",
                    "priority_order": ["primary", "secondary"]
                }
            },
            "key_identifiers": {"app_id_xpath": "/App", "app_id_attribute": "id"}
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn maps_application_and_contact_rows() {
        let xml = r#"<App id="5"><Contacts>
            <Contact con_id="1" type="primary" first_name="Ada" birth_date="1990-01-01"/>
        </Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let app_id = AppId::new(5).unwrap();
        let rows = MappingEngine::apply_contract(app_id, &doc, &contract()).unwrap();

        assert_eq!(rows["applications"].len(), 1);
        assert_eq!(rows["applications"][0].get_value("app_id"), model::core::value::Value::Int(5));
        assert_eq!(rows["contacts"].len(), 1);
        assert_eq!(
            rows["contacts"][0].get_value("first_name"),
            model::core::value::Value::String("Ada".to_string())
        );
    }

    #[test]
    fn suppresses_non_meaningful_contact() {
        let xml = r#"<App id="5"><Contacts>
            <Contact con_id="1" type="primary"/>
        </Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let app_id = AppId::new(5).unwrap();
        let rows = MappingEngine::apply_contract(app_id, &doc, &contract()).unwrap();
        assert!(rows.get("contacts").map(|r| r.is_empty()).unwrap_or(true));
    }

    fn aux_contract(table_json: &str) -> Contract {
        ContractLoader::load(&format!(
            r#"{{
            "target_schema": "ins",
            "table_insertion_order": ["aux"],
            "tables": {{"aux": {table_json}}},
            "enum_mappings": {{}},
            "element_filtering": {{}},
            "key_identifiers": {{"app_id_xpath": "/App", "app_id_attribute": "id"}}
        }}"#
        ))
        .unwrap()
    }

    #[test]
    fn add_score_row_carries_app_id() {
        let contract = aux_contract(
            r#"{
                "category": "Auxiliary",
                "mappings": [
                    {"xml_path": "/App/Scores/Score", "xml_attribute": "value",
                     "target_column": "score", "data_type": "Decimal",
                     "mapping_type": "add_score(composite)"}
                ],
                "columns": {}
            }"#,
        );
        let xml = r#"<App id="5"><Scores><Score value="712.5"/></Scores></App>"#;
        let doc = Document::parse(xml).unwrap();
        let rows = MappingEngine::apply_contract(AppId::new(5).unwrap(), &doc, &contract).unwrap();

        let aux = &rows["aux"];
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].get_value("app_id"), Value::Int(5));
        assert_eq!(aux[0].get_value("score_identifier"), Value::String("composite".to_string()));
        assert!(aux[0].get_value("score").as_f64().unwrap() > 712.0);
    }

    #[test]
    fn add_indicator_only_emits_on_truthy_source() {
        let contract = aux_contract(
            r#"{
                "category": "Auxiliary",
                "mappings": [
                    {"xml_path": "/App/Flags/Flag", "xml_attribute": "set",
                     "target_column": "value", "mapping_type": "add_indicator(has_lien)"}
                ],
                "columns": {}
            }"#,
        );
        let xml = r#"<App id="5"><Flags>
            <Flag set="N"/>
            <Flag set="Y"/>
        </Flags></App>"#;
        let doc = Document::parse(xml).unwrap();
        let rows = MappingEngine::apply_contract(AppId::new(5).unwrap(), &doc, &contract).unwrap();

        let aux = &rows["aux"];
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].get_value("indicator"), Value::String("has_lien".to_string()));
        assert_eq!(aux[0].get_value("value"), Value::String("1".to_string()));
    }

    #[test]
    fn warranty_field_groups_by_enum_bucket() {
        let contract = aux_contract(
            r#"{
                "category": "Auxiliary",
                "mappings": [
                    {"xml_path": "/App/Warranty", "xml_attribute": "company",
                     "target_column": "company_name", "mapping_type": "warranty_field(extended)"},
                    {"xml_path": "/App/Warranty", "xml_attribute": "amount",
                     "target_column": "amount", "data_type": "Decimal",
                     "mapping_type": "warranty_field(extended)"}
                ],
                "columns": {}
            }"#,
        );
        let xml = r#"<App id="5"><Warranty company="Acme" amount="1200.00"/></App>"#;
        let doc = Document::parse(xml).unwrap();
        let rows = MappingEngine::apply_contract(AppId::new(5).unwrap(), &doc, &contract).unwrap();

        let aux = &rows["aux"];
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].get_value("company_name"), Value::String("Acme".to_string()));
        assert_eq!(aux[0].get_value("merrick_lienholder_flag"), Value::Boolean(false));
    }

    #[test]
    fn add_collateral_groups_by_slot_and_sets_sort_order() {
        let contract = aux_contract(
            r#"{
                "category": "Auxiliary",
                "mappings": [
                    {"xml_path": "/App/Collateral/Item1", "xml_attribute": "description",
                     "target_column": "description", "mapping_type": "add_collateral(1)"},
                    {"xml_path": "/App/Collateral/Item2", "xml_attribute": "description",
                     "target_column": "description", "mapping_type": "add_collateral(2)"}
                ],
                "columns": {}
            }"#,
        );
        let xml = r#"<App id="5"><Collateral>
            <Item1 description="Truck"/>
        </Collateral></App>"#;
        let doc = Document::parse(xml).unwrap();
        let rows = MappingEngine::apply_contract(AppId::new(5).unwrap(), &doc, &contract).unwrap();

        let aux = &rows["aux"];
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].get_value("sort_order"), Value::Int(1));
        assert_eq!(aux[0].get_value("description"), Value::String("Truck".to_string()));
    }
}

use crate::{error::ValidationError, filter};
use model::{
    contract::{Contract, ElementKind},
    core::identifiers::AppId,
};
use roxmltree::{Document, Node};
use tracing::warn;

/// The result of pre-processing validation: either a ready-to-map document
/// plus its surviving primary contacts, or a reason processing cannot
/// continue.
pub struct ValidationOutcome<'a, 'i> {
    pub can_process: bool,
    pub app_id: Option<AppId>,
    pub valid_contacts: Vec<Node<'a, 'i>>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl<'a, 'i> ValidationOutcome<'a, 'i> {
    fn failed(error: impl ToString) -> Self {
        Self {
            can_process: false,
            app_id: None,
            valid_contacts: Vec::new(),
            errors: vec![error.to_string()],
            warnings: Vec::new(),
        }
    }
}

/// Confirms the XML is well-formed, the application identifier is
/// extractable and in range, and at least one contact survives filtering
/// as the primary contact type. Never panics on malformed input; every
/// failure path returns a non-`can_process` outcome for the caller to log
/// and move past.
pub fn validate<'a, 'i>(doc: &'i Document<'a>, contract: &Contract) -> ValidationOutcome<'a, 'i> {
    let key_ids = &contract.key_identifiers;
    let candidates = crate::xpath::select(doc, &key_ids.app_id_xpath);
    let Some(app_node) = candidates.first() else {
        return ValidationOutcome::failed(ValidationError::MissingAppId {
            xpath: key_ids.app_id_xpath.clone(),
            attribute: key_ids.app_id_attribute.clone(),
        });
    };

    let Some(raw_app_id) = app_node.attribute(key_ids.app_id_attribute.as_str()) else {
        return ValidationOutcome::failed(ValidationError::MissingAppId {
            xpath: key_ids.app_id_xpath.clone(),
            attribute: key_ids.app_id_attribute.clone(),
        });
    };

    let Ok(raw_value) = raw_app_id.trim().parse::<i64>() else {
        return ValidationOutcome::failed(ValidationError::InvalidAppId(raw_app_id.to_string()));
    };

    let Ok(app_id) = AppId::new(raw_value) else {
        return ValidationOutcome::failed(ValidationError::InvalidAppId(raw_app_id.to_string()));
    };

    let mut warnings = Vec::new();

    let Some(contact_rule) = contract.filter_rule(ElementKind::Contact) else {
        return ValidationOutcome::failed("contract has no element_filtering rule for contact");
    };

    let contacts = filter::apply(doc, contact_rule);
    let primary_type = contact_rule.priority_order.first();

    let has_primary = match primary_type {
        Some(primary_type) => contacts.iter().any(|c| {
            c.attribute(contact_rule.type_attribute.as_str())
                .map(|v| v.eq_ignore_ascii_case(primary_type))
                .unwrap_or(false)
        }),
        None => !contacts.is_empty(),
    };

    if !has_primary {
        warn!(app_id = %app_id, "no primary contact survived filtering");
        return ValidationOutcome {
            can_process: false,
            app_id: Some(app_id),
            valid_contacts: contacts,
            errors: vec!["no valid primary contact".to_string()],
            warnings,
        };
    }

    warnings.push(format!("{} contact(s) survived filtering", contacts.len()));

    ValidationOutcome {
        can_process: true,
        app_id: Some(app_id),
        valid_contacts: contacts,
        errors: Vec::new(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract::ContractLoader;

    fn contract() -> Contract {
        ContractLoader::load(
            r#"{
            "target_schema": "ins",
            "table_insertion_order": ["applications"],
            "tables": {
                "applications": {
                    "category": "ApplicationRoot",
                    "mappings": [{"xml_path": "/App", "xml_attribute": "id", "target_column": "app_id"}],
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
    fn accepts_document_with_primary_contact() {
        let xml = r#"<App id="42"><Contacts><Contact con_id="1" type="primary"/></Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let outcome = validate(&doc, &contract());
        assert!(outcome.can_process);
        assert_eq!(outcome.app_id.unwrap().get(), 42);
    }

    #[test]
    fn rejects_document_missing_primary_contact() {
        let xml = r#"<App id="42"><Contacts><Contact con_id="1" type="secondary"/></Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let outcome = validate(&doc, &contract());
        assert!(!outcome.can_process);
    }

    #[test]
    fn rejects_out_of_range_app_id() {
        let xml = r#"<App id="0"/>"#;
        let doc = Document::parse(xml).unwrap();
        let outcome = validate(&doc, &contract());
        assert!(!outcome.can_process);
        assert!(outcome.app_id.is_none());
    }
}

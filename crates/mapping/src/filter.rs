use crate::xpath;
use model::contract::FilterRule;
use roxmltree::{Document, Node};
use std::collections::HashMap;

/// Selects, validates, and deduplicates the elements governed by one
/// filter rule. Never errors on missing elements — an empty result is a
/// valid outcome, left for the caller (the Pre-Processing Validator, the
/// Mapping Engine) to act on.
pub fn apply<'a, 'i>(doc: &'i Document<'a>, rule: &FilterRule) -> Vec<Node<'a, 'i>> {
    let candidates = xpath::select(doc, &rule.xpath);

    let survivors: Vec<Node> = candidates
        .into_iter()
        .filter(|el| {
            rule.required_attributes
                .iter()
                .all(|req| req.is_satisfied_by(el.attribute(req.name.as_str())))
        })
        .collect();

    dedup_by_identity(survivors, rule)
}

/// Groups by `identity_attribute`, keeping the element with the lowest
/// `priority_order` rank on its `type_attribute`; ties go to the textually
/// last occurrence.
fn dedup_by_identity<'a, 'i>(elements: Vec<Node<'a, 'i>>, rule: &FilterRule) -> Vec<Node<'a, 'i>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Node<'a, 'i>>> = HashMap::new();

    for el in elements {
        let id = el
            .attribute(rule.identity_attribute.as_str())
            .unwrap_or_default()
            .to_string();
        if !groups.contains_key(&id) {
            order.push(id.clone());
        }
        groups.entry(id).or_default().push(el);
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id))
        .filter_map(|candidates| {
            candidates
                .into_iter()
                .enumerate()
                .min_by_key(|(i, el)| {
                    let type_value = el.attribute(rule.type_attribute.as_str()).unwrap_or_default();
                    (rule.priority_rank(type_value), std::cmp::Reverse(*i))
                })
                .map(|(_, el)| el)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::contract::RequiredAttribute;

    fn rule() -> FilterRule {
        FilterRule {
            xpath: "/App/Contacts/Contact".to_string(),
            identity_attribute: "con_id".to_string(),
            required_attributes: vec![RequiredAttribute {
                name: "con_id".to_string(),
                allowed_values: None,
            }],
            type_attribute: "type".to_string(),
            priority_order: vec!["primary".to_string(), "secondary".to_string()],
        }
    }

    #[test]
    fn dedups_keeping_highest_priority() {
        let xml = r#"<App><Contacts>
            <Contact con_id="1" type="secondary" first_name="A"/>
            <Contact con_id="1" type="primary" first_name="B"/>
        </Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let survivors = apply(&doc, &rule());
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].attribute("first_name"), Some("B"));
    }

    #[test]
    fn equal_priority_ties_break_to_last_occurrence() {
        let xml = r#"<App><Contacts>
            <Contact con_id="1" type="primary" first_name="A"/>
            <Contact con_id="1" type="primary" first_name="B"/>
        </Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let survivors = apply(&doc, &rule());
        assert_eq!(survivors[0].attribute("first_name"), Some("B"));
    }

    #[test]
    fn missing_required_attribute_is_rejected() {
        let xml = r#"<App><Contacts>
            <Contact type="primary"/>
        </Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(apply(&doc, &rule()).is_empty());
    }
}

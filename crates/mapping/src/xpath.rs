//! A deliberately small subset of XPath: absolute, tag-only paths like
//! `/App/Contacts/Contact`. No predicates, no attribute axes, no
//! wildcards — contract documents in this system only ever need "walk
//! down these element names," and a hand-rolled walker avoids pulling in
//! a full XPath engine for that.

use roxmltree::{Document, Node};

pub fn select<'a, 'i>(doc: &'i Document<'a>, path: &str) -> Vec<Node<'a, 'i>> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    let Some((root_name, rest)) = segments.split_first() else {
        return Vec::new();
    };

    let root = doc.root_element();
    if root.tag_name().name() != *root_name {
        return Vec::new();
    }

    let mut current = vec![root];
    for segment in rest {
        let mut next = Vec::new();
        for node in &current {
            next.extend(
                node.children()
                    .filter(|c| c.is_element() && c.tag_name().name() == *segment),
            );
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_repeated_leaf_elements() {
        let xml = r#"<App id="1"><Contacts><Contact id="a"/><Contact id="b"/></Contacts></App>"#;
        let doc = Document::parse(xml).unwrap();
        let found = select(&doc, "/App/Contacts/Contact");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn wrong_root_yields_empty() {
        let xml = r#"<App id="1"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(select(&doc, "/Other").is_empty());
    }
}

use expr::EvalContext;
use model::core::value::Value;
use roxmltree::Node;

/// Flattens one element's attributes into an [`EvalContext`], optionally
/// namespaced under a prefix (`"contact."` for cross-element references).
pub fn flatten_attributes(ctx: &mut EvalContext, node: &Node, prefix: Option<&str>) {
    for attr in node.attributes() {
        let key = match prefix {
            Some(p) => format!("{p}.{}", attr.name()),
            None => attr.name().to_string(),
        };
        ctx.set(key, Value::String(attr.value().to_string()));
    }
}

pub fn build_root_context(root: &Node) -> EvalContext {
    let mut ctx = EvalContext::new();
    flatten_attributes(&mut ctx, root, None);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn flattens_root_attributes() {
        let xml = r#"<App id="42" status="new"/>"#;
        let doc = Document::parse(xml).unwrap();
        let ctx = build_root_context(&doc.root_element());
        assert_eq!(ctx.resolve("status"), Value::String("new".to_string()));
    }

    #[test]
    fn namespaces_under_prefix() {
        let xml = r#"<Contact first_name="Jo"/>"#;
        let doc = Document::parse(xml).unwrap();
        let mut ctx = EvalContext::new();
        flatten_attributes(&mut ctx, &doc.root_element(), Some("contact"));
        assert_eq!(
            ctx.resolve("contact.first_name"),
            Value::String("Jo".to_string())
        );
    }
}

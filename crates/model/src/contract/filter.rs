use serde::{Deserialize, Serialize};

/// The logical element type a filter rule governs. A closed enum rather
/// than string-keyed dispatch, so an unrecognized element kind is a
/// deserialization error instead of a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Contact,
    Address,
    Employment,
}

/// One required attribute on a filter rule: either presence-nonempty, or
/// membership in an (case-insensitive) enumerated value set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredAttribute {
    pub name: String,
    /// `None` means "present and non-empty"; `Some(values)` means
    /// "present and case-insensitively equal to one of these".
    pub allowed_values: Option<Vec<String>>,
}

impl RequiredAttribute {
    pub fn is_satisfied_by(&self, value: Option<&str>) -> bool {
        let Some(value) = value else { return false };
        if value.trim().is_empty() {
            return false;
        }
        match &self.allowed_values {
            None => true,
            Some(values) => values.iter().any(|v| v.eq_ignore_ascii_case(value)),
        }
    }
}

/// An `element_filtering.filter_rules[]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRule {
    pub xpath: String,
    pub identity_attribute: String,
    #[serde(default)]
    pub required_attributes: Vec<RequiredAttribute>,
    /// The attribute whose value is ranked against `priority_order` when
    /// multiple elements share the same `identity_attribute` value.
    pub type_attribute: String,
    /// Ordered from highest to lowest priority; ties broken by "last valid
    /// element" (textually last occurrence wins).
    #[serde(default)]
    pub priority_order: Vec<String>,
}

impl FilterRule {
    /// Lower index = higher priority. Unknown type values sort last.
    pub fn priority_rank(&self, type_value: &str) -> usize {
        self.priority_order
            .iter()
            .position(|v| v.eq_ignore_ascii_case(type_value))
            .unwrap_or(self.priority_order.len())
    }
}

use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row destined for one target table: the output unit of the mapping
/// engine. Columns whose mapping yielded "no
/// value" are omitted from `field_values`, not present with `Value::Null`,
/// so the database default applies on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: impl Into<String>) -> Self {
        RowData {
            entity: entity.into(),
            field_values: Vec::new(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(existing) = self
            .field_values
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&name))
        {
            *existing = value;
        } else {
            self.field_values.push(value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field).map(|f| f.value.clone()).unwrap_or(Value::Null)
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// A row is "meaningful" if at least
    /// one of the given non-identity columns is populated with a non-empty
    /// value.
    pub fn has_any_meaningful(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| {
            self.get(f)
                .map(|fv| !fv.value.is_empty_like())
                .unwrap_or(false)
        })
    }

    pub fn size_bytes(&self) -> usize {
        let mut size = self.entity.len();
        for fv in &self.field_values {
            size += fv.name.len() + fv.value.size_bytes();
        }
        size
    }
}

/// `{table -> ordered rows}`, the output of mapping one application.
pub type RowSet = HashMap<String, Vec<RowData>>;

pub fn merge_row_set(target: &mut RowSet, table: &str, mut rows: Vec<RowData>) {
    target.entry(table.to_string()).or_default().append(&mut rows);
}

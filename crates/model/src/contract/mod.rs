pub mod doc;
pub mod filter;
pub mod mapping;
pub mod schema;

pub use doc::{Contract, KeyIdentifiers, TableSpec};
pub use filter::{ElementKind, FilterRule, RequiredAttribute};
pub use mapping::{FieldMapping, MappingStep};
pub use schema::{ColumnMeta, EnumMapping, TableCategory};

//! Turns one parsed application document plus its contract into the row
//! set a destination writer can insert: pre-processing validation, element
//! filtering, the mapping-type chain, and auxiliary row construction.

pub mod chain;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod validation;
pub mod xpath;

pub use engine::MappingEngine;
pub use error::{MappingError, ValidationError};
pub use validation::{validate, ValidationOutcome};

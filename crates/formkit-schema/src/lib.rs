mod rule;
mod schema;

pub use rule::{Check, Rule};
pub use schema::{FieldKind, FieldSchema, Schema};

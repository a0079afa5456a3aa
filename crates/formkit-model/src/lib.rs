pub mod error;
pub mod path;
pub mod value;

pub use error::PathParseError;
pub use path::{FieldPath, Segment};
pub use value::{FieldValue, Record, Values, resolve, resolve_mut};

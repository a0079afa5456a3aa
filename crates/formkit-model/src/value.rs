use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::path::{FieldPath, Segment};

/// One array element: named sub-fields and their values.
pub type Record = BTreeMap<String, FieldValue>;

/// All values of one form instance, keyed by top-level field name.
pub type Values = BTreeMap<String, FieldValue>;

/// The closed set of shapes a form value can take.
///
/// Serialized untagged so a values document reads as plain JSON:
/// `{"email": "a@b.co", "newsletter": true, "metadata": [{"key": "k"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Items(Vec<Record>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&Vec<Record>> {
        match self {
            FieldValue::Items(items) => Some(items),
            _ => None,
        }
    }
}

/// Resolve a path against a values map.
///
/// Returns `None` when the path does not address a value in the current
/// shape of `values` (missing field, index past the end, or a segment kind
/// that does not match the value it lands on).
pub fn resolve<'a>(values: &'a Values, path: &FieldPath) -> Option<&'a FieldValue> {
    let mut scope = values;
    let segments = path.segments();
    let mut position = 0;
    while position < segments.len() {
        let Segment::Name(name) = &segments[position] else {
            return None;
        };
        if position + 1 == segments.len() {
            return scope.get(name);
        }
        let Segment::Index(index) = &segments[position + 1] else {
            return None;
        };
        let FieldValue::Items(items) = scope.get(name)? else {
            return None;
        };
        scope = items.get(*index)?;
        position += 2;
    }
    None
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(values: &'a mut Values, path: &FieldPath) -> Option<&'a mut FieldValue> {
    let mut scope = values;
    let segments = path.segments();
    let mut position = 0;
    while position < segments.len() {
        let Segment::Name(name) = &segments[position] else {
            return None;
        };
        if position + 1 == segments.len() {
            return scope.get_mut(name);
        }
        let Segment::Index(index) = &segments[position + 1] else {
            return None;
        };
        let FieldValue::Items(items) = scope.get_mut(name)? else {
            return None;
        };
        scope = items.get_mut(*index)?;
        position += 2;
    }
    None
}

use std::collections::BTreeMap;

use formkit_model::{FieldPath, FieldValue, Record, Segment, Values};

use crate::rule::Rule;

/// The shape a declared field takes. Arrays carry their element schema,
/// which is a full [`Schema`] in its own right, so element records validate
/// recursively.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Flag,
    Array(Schema),
}

/// One declared field: name, shape, and its ordered rule list. For array
/// fields the rules are the aggregate rules over the whole array; element
/// rules live in the element schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    kind: FieldKind,
    rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The blank value a field of this shape starts out with.
    pub fn default_value(&self) -> FieldValue {
        match &self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::Array(_) => FieldValue::Items(Vec::new()),
        }
    }
}

/// A declarative description of per-field rules, cross-field references,
/// and array constraints. Pure and stateless: [`Schema::validate`] is a
/// deterministic function of the values snapshot it is handed.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a text field with its ordered rules.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind: FieldKind::Text,
            rules,
        });
        self
    }

    /// Declare a boolean field with its ordered rules.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind: FieldKind::Flag,
            rules,
        });
        self
    }

    /// Declare an array field: an element schema validated per element plus
    /// aggregate rules over the whole array.
    #[must_use]
    pub fn with_array(
        mut self,
        name: impl Into<String>,
        element: Schema,
        aggregate: Vec<Rule>,
    ) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind: FieldKind::Array(element),
            rules: aggregate,
        });
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether a path addresses a field this schema declares, directly or
    /// through an array element.
    pub fn covers(&self, path: &FieldPath) -> bool {
        self.covers_segments(path.segments())
    }

    fn covers_segments(&self, segments: &[Segment]) -> bool {
        let [Segment::Name(name), rest @ ..] = segments else {
            return false;
        };
        let Some(field) = self.field(name) else {
            return false;
        };
        if rest.is_empty() {
            return true;
        }
        let FieldKind::Array(element) = &field.kind else {
            return false;
        };
        let [Segment::Index(_), tail @ ..] = rest else {
            return false;
        };
        if tail.is_empty() {
            return true;
        }
        element.covers_segments(tail)
    }

    /// A values map with every declared field at its blank default. Array
    /// element defaults come from [`Schema::default_record`] as elements are
    /// appended, not up front.
    pub fn default_values(&self) -> Values {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.default_value()))
            .collect()
    }

    /// A blank element record for an array with this element schema.
    pub fn default_record(&self) -> Record {
        self.default_values()
    }

    /// Validate a values snapshot.
    ///
    /// Scalar fields surface the first failing rule's message under their
    /// own path. Array fields validate every element against the element
    /// schema first; aggregate rules are evaluated, and reported under the
    /// array's path, only once every element is individually clean.
    pub fn validate(&self, values: &Values) -> BTreeMap<FieldPath, String> {
        let mut errors = BTreeMap::new();
        self.validate_scope(None, values, &mut errors);
        errors
    }

    fn validate_scope(
        &self,
        prefix: Option<&FieldPath>,
        scope: &Values,
        errors: &mut BTreeMap<FieldPath, String>,
    ) {
        for field in &self.fields {
            let path = match prefix {
                Some(prefix) => prefix.child(field.name.as_str()),
                None => FieldPath::field(field.name.as_str()),
            };
            let value = scope.get(&field.name);
            match &field.kind {
                FieldKind::Text | FieldKind::Flag => {
                    if let Some(rule) = field.rules.iter().find(|rule| !rule.passes(value, scope)) {
                        errors.insert(path, rule.message().to_string());
                    }
                }
                FieldKind::Array(element) => {
                    let items: &[Record] = value
                        .and_then(FieldValue::as_items)
                        .map_or(&[], Vec::as_slice);
                    let before = errors.len();
                    for (index, record) in items.iter().enumerate() {
                        let element_path = path.clone().with_index(index);
                        element.validate_scope(Some(&element_path), record, errors);
                    }
                    // Element-level failures suppress the aggregate rules.
                    if errors.len() == before
                        && let Some(rule) =
                            field.rules.iter().find(|rule| !rule.passes(value, scope))
                    {
                        errors.insert(path, rule.message().to_string());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn metadata_schema() -> Schema {
        let element = Schema::new()
            .with_text("key", vec![Rule::required("Required")])
            .with_text("value", vec![Rule::required("Required")]);
        Schema::new().with_array(
            "metadata",
            element,
            vec![Rule::min_items(3, "Minimum of 3 metadata")],
        )
    }

    fn entry(key: &str, value: &str) -> Record {
        let mut record = Record::new();
        record.insert("key".to_string(), FieldValue::text(key));
        record.insert("value".to_string(), FieldValue::text(value));
        record
    }

    #[test]
    fn first_failing_rule_wins() {
        let schema = Schema::new().with_text(
            "email",
            vec![Rule::required("Required"), Rule::email("Invalid email")],
        );
        let mut values = Values::new();
        values.insert("email".to_string(), FieldValue::text(""));
        let errors = schema.validate(&values);
        assert_eq!(
            errors.get(&FieldPath::field("email")).map(String::as_str),
            Some("Required")
        );

        values.insert("email".to_string(), FieldValue::text("not-an-email"));
        let errors = schema.validate(&values);
        assert_eq!(
            errors.get(&FieldPath::field("email")).map(String::as_str),
            Some("Invalid email")
        );
    }

    #[test]
    fn element_errors_suppress_aggregate_errors() {
        let schema = metadata_schema();
        let mut values = Values::new();
        values.insert(
            "metadata".to_string(),
            FieldValue::Items(vec![entry("", "")]),
        );

        let errors = schema.validate(&values);
        let key_path: FieldPath = "metadata[0].key".parse().unwrap();
        assert_eq!(errors.get(&key_path).map(String::as_str), Some("Required"));
        assert!(!errors.contains_key(&FieldPath::field("metadata")));
    }

    #[test]
    fn aggregate_error_appears_once_elements_are_clean() {
        let schema = metadata_schema();
        let mut values = Values::new();
        values.insert(
            "metadata".to_string(),
            FieldValue::Items(vec![entry("env", "prod")]),
        );

        let errors = schema.validate(&values);
        assert_eq!(
            errors.get(&FieldPath::field("metadata")).map(String::as_str),
            Some("Minimum of 3 metadata")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_array_counts_as_empty_for_aggregates() {
        let schema = metadata_schema();
        let errors = schema.validate(&Values::new());
        assert_eq!(
            errors.get(&FieldPath::field("metadata")).map(String::as_str),
            Some("Minimum of 3 metadata")
        );
    }

    #[test]
    fn covers_declared_paths_only() {
        let schema = metadata_schema().with_text("email", Vec::new());
        for covered in ["email", "metadata", "metadata[0]", "metadata[7].key"] {
            let path: FieldPath = covered.parse().unwrap();
            assert!(schema.covers(&path), "{covered}");
        }
        for uncovered in ["nickname", "metadata[0].missing", "email[0].x"] {
            let path: FieldPath = uncovered.parse().unwrap();
            assert!(!schema.covers(&path), "{uncovered}");
        }
    }

    #[test]
    fn default_values_match_field_kinds() {
        let schema = Schema::new()
            .with_text("email", Vec::new())
            .with_flag("newsletter", Vec::new())
            .with_array("metadata", Schema::new(), Vec::new());
        let values = schema.default_values();
        assert_eq!(values.get("email"), Some(&FieldValue::Text(String::new())));
        assert_eq!(values.get("newsletter"), Some(&FieldValue::Flag(false)));
        assert_eq!(values.get("metadata"), Some(&FieldValue::Items(Vec::new())));
    }
}

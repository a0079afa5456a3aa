use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use formkit_model::{FieldPath, FieldValue, Segment, Values, resolve, resolve_mut};
use formkit_schema::{FieldKind, Schema};

/// The value/touched/error bundle the rendering layer binds one field to.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub value: Option<&'a FieldValue>,
    pub touched: bool,
    pub error: Option<&'a str>,
}

/// Owns the state of one form instance: values, touched flags, the error
/// map, and the submission status. Exclusively owned by one form screen;
/// every mutation goes through the methods here.
///
/// The error map is recomputed in full from the current values on every
/// relevant change: a cross-field rule means an edit to one field can move
/// the reported error on another, so errors are never patched in place.
#[derive(Debug)]
pub struct FormStore {
    pub(crate) schema: Schema,
    pub(crate) initial: Values,
    pub(crate) values: Values,
    pub(crate) touched: BTreeSet<FieldPath>,
    pub(crate) errors: BTreeMap<FieldPath, String>,
    pub(crate) submitting: bool,
    pub(crate) submit_epoch: u64,
    pub(crate) form_error: Option<String>,
}

impl FormStore {
    /// Mount a form with an initial values snapshot. Errors are computed
    /// immediately so `errors` is a pure function of `values` from the
    /// first read onward.
    pub fn new(schema: Schema, initial: Values) -> Self {
        let errors = schema.validate(&initial);
        Self {
            values: initial.clone(),
            initial,
            schema,
            touched: BTreeSet::new(),
            errors,
            submitting: false,
            submit_epoch: 0,
            form_error: None,
        }
    }

    /// Mount a form with every field at its schema default.
    pub fn with_defaults(schema: Schema) -> Self {
        let initial = schema.default_values();
        Self::new(schema, initial)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True iff values differ from the snapshot taken at mount (or at the
    /// last [`FormStore::reset`]).
    pub fn dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    /// Form-level error from the last failed submission, if any.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn value(&self, path: &FieldPath) -> Option<&FieldValue> {
        resolve(&self.values, path)
    }

    pub fn touched(&self, path: &FieldPath) -> bool {
        self.touched.contains(path)
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// The display contract: a field's error is shown only once the field
    /// has been touched. Storage keeps the raw error either way.
    pub fn visible_error(&self, path: &FieldPath) -> Option<&str> {
        if self.touched(path) { self.error(path) } else { None }
    }

    pub fn field(&self, path: &FieldPath) -> FieldView<'_> {
        FieldView {
            value: self.value(path),
            touched: self.touched(path),
            error: self.error(path),
        }
    }

    /// Update one field's value and recompute the whole error map. Touched
    /// state is left alone. A path the schema does not cover, or that does
    /// not resolve against the current values, is ignored.
    pub fn set_value(&mut self, path: &FieldPath, value: FieldValue) {
        if !self.schema.covers(path) {
            warn!(%path, "set_value path not covered by schema; ignoring");
            return;
        }
        match path.segments() {
            [Segment::Name(name)] => {
                self.values.insert(name.clone(), value);
            }
            _ => match resolve_mut(&mut self.values, path) {
                Some(slot) => *slot = value,
                None => {
                    warn!(%path, "set_value path does not resolve; ignoring");
                    return;
                }
            },
        }
        self.revalidate();
    }

    /// Mark a field as interacted with. Idempotent; never unset except by
    /// [`FormStore::reset`] or array re-indexing.
    pub fn set_touched(&mut self, path: &FieldPath) {
        if !self.schema.covers(path) {
            warn!(%path, "set_touched path not covered by schema; ignoring");
            return;
        }
        self.touched.insert(path.clone());
    }

    /// Replace values with a fresh snapshot, clearing touched state, the
    /// form-level error, and the dirty flag.
    pub fn reset(&mut self, initial: Values) {
        self.values = initial.clone();
        self.initial = initial;
        self.touched.clear();
        self.form_error = None;
        self.revalidate();
    }

    pub(crate) fn revalidate(&mut self) {
        self.errors = self.schema.validate(&self.values);
    }

    /// Mark every schema-covered path currently present in the values as
    /// touched, so all relevant errors become visible (submit semantics).
    pub(crate) fn touch_all(&mut self) {
        let mut paths = Vec::new();
        collect_paths(&self.schema, None, &self.values, &mut paths);
        self.touched.extend(paths);
    }
}

fn collect_paths(
    schema: &Schema,
    prefix: Option<&FieldPath>,
    scope: &Values,
    out: &mut Vec<FieldPath>,
) {
    for field in schema.fields() {
        let path = match prefix {
            Some(prefix) => prefix.child(field.name()),
            None => FieldPath::field(field.name()),
        };
        out.push(path.clone());
        if let FieldKind::Array(element) = field.kind()
            && let Some(FieldValue::Items(items)) = scope.get(field.name())
        {
            for (index, record) in items.iter().enumerate() {
                let element_path = path.clone().with_index(index);
                collect_paths(element, Some(&element_path), record, out);
            }
        }
    }
}

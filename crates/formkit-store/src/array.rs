use tracing::warn;

use formkit_model::{FieldValue, Record, Segment};
use formkit_schema::FieldKind;

use crate::store::FormStore;

/// A view over one array-typed field of a [`FormStore`]: structural
/// mutation (append/remove) without disturbing unrelated fields.
#[derive(Debug)]
pub struct FieldArray<'a> {
    store: &'a mut FormStore,
    field: String,
}

impl FormStore {
    /// Borrow an array field for structural mutation. Returns `None` when
    /// the schema does not declare `field` as an array.
    pub fn array(&mut self, field: &str) -> Option<FieldArray<'_>> {
        let is_array = matches!(
            self.schema.field(field).map(|f| f.kind()),
            Some(FieldKind::Array(_))
        );
        if !is_array {
            warn!(field, "not an array field");
            return None;
        }
        Some(FieldArray {
            store: self,
            field: field.to_string(),
        })
    }
}

impl FieldArray<'_> {
    /// Current element count.
    pub fn len(&self) -> usize {
        self.store
            .values
            .get(&self.field)
            .and_then(FieldValue::as_items)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a blank element built from the element schema's defaults.
    pub fn push_default(&mut self) {
        let Some(FieldKind::Array(element)) =
            self.store.schema.field(&self.field).map(|f| f.kind())
        else {
            return;
        };
        let record = element.default_record();
        self.push(record);
    }

    /// Append an element at the end and re-run validation.
    pub fn push(&mut self, element: Record) {
        let slot = self
            .store
            .values
            .entry(self.field.clone())
            .or_insert_with(|| FieldValue::Items(Vec::new()));
        if let FieldValue::Items(items) = slot {
            items.push(element);
        } else {
            warn!(field = %self.field, "array field holds a non-array value; ignoring push");
            return;
        }
        self.store.revalidate();
    }

    /// Delete the element at `index`. Elements after it shift down by one;
    /// their paths are recomputed by the next validation pass, and touched
    /// entries keyed at or beyond the removed index are dropped rather than
    /// re-attached. Removing from an empty array or past the end is a
    /// silent no-op.
    pub fn remove(&mut self, index: usize) {
        let Some(FieldValue::Items(items)) = self.store.values.get_mut(&self.field) else {
            warn!(field = %self.field, "array field holds no items; ignoring removal");
            return;
        };
        if index >= items.len() {
            warn!(
                field = %self.field,
                index,
                len = items.len(),
                "out-of-range array removal; ignoring"
            );
            return;
        }
        items.remove(index);
        let field = self.field.as_str();
        self.store.touched.retain(|path| match path.segments() {
            [Segment::Name(name), Segment::Index(element), ..] if name == field => {
                *element < index
            }
            _ => true,
        });
        self.store.revalidate();
    }
}

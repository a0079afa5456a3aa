use formkit_model::{FieldValue, Values};
use regex::Regex;

/// A single validation rule: one check and the message surfaced when it
/// fails. Rules attached to the same field run in declared order and the
/// first failure wins.
#[derive(Debug, Clone)]
pub struct Rule {
    check: Check,
    message: String,
}

/// The closed set of checks a rule can perform.
///
/// Required-ness is an ordinary check in the ordered rule list, not a
/// separate code path: a field with no `Required` rule and no value simply
/// produces no error. Every other value-shaped check passes on an absent or
/// empty value for the same reason.
#[derive(Debug, Clone)]
pub enum Check {
    /// Value must be present and non-empty.
    Required,
    /// Text must be at least this many characters.
    MinLength(usize),
    /// Text must be at most this many characters.
    MaxLength(usize),
    /// Text must look like an email address (local@domain.tld).
    Email,
    /// Text must match the pattern.
    Pattern(Regex),
    /// Text must equal the referenced field's current value (cross-field).
    EqualsField(String),
    /// Array must hold at least this many elements (aggregate).
    MinItems(usize),
    /// Array must hold at most this many elements (aggregate).
    MaxItems(usize),
}

impl Rule {
    pub fn new(check: Check, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(Check::Required, message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::new(Check::MinLength(min), message)
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::new(Check::MaxLength(max), message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(Check::Email, message)
    }

    pub fn pattern(pattern: Regex, message: impl Into<String>) -> Self {
        Self::new(Check::Pattern(pattern), message)
    }

    pub fn equals_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Check::EqualsField(field.into()), message)
    }

    pub fn min_items(min: usize, message: impl Into<String>) -> Self {
        Self::new(Check::MinItems(min), message)
    }

    pub fn max_items(max: usize, message: impl Into<String>) -> Self {
        Self::new(Check::MaxItems(max), message)
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this rule constrains a whole array rather than one value.
    pub fn is_aggregate(&self) -> bool {
        matches!(self.check, Check::MinItems(_) | Check::MaxItems(_))
    }

    /// Evaluate the check against a field's value. `scope` is the values
    /// snapshot the field lives in; cross-field checks read the referenced
    /// field from it, never from a cached copy.
    pub(crate) fn passes(&self, value: Option<&FieldValue>, scope: &Values) -> bool {
        match &self.check {
            Check::Required => match value {
                None => false,
                Some(FieldValue::Text(text)) => !text.is_empty(),
                Some(FieldValue::Flag(_)) => true,
                Some(FieldValue::Items(items)) => !items.is_empty(),
            },
            Check::MinLength(min) => {
                non_empty_text(value).is_none_or(|text| text.chars().count() >= *min)
            }
            Check::MaxLength(max) => {
                non_empty_text(value).is_none_or(|text| text.chars().count() <= *max)
            }
            Check::Email => non_empty_text(value).is_none_or(looks_like_email),
            Check::Pattern(pattern) => {
                non_empty_text(value).is_none_or(|text| pattern.is_match(text))
            }
            Check::EqualsField(other) => non_empty_text(value).is_none_or(|text| {
                let expected = scope.get(other).and_then(FieldValue::as_text).unwrap_or("");
                text == expected
            }),
            Check::MinItems(min) => item_count(value) >= *min,
            Check::MaxItems(max) => item_count(value) <= *max,
        }
    }
}

fn non_empty_text(value: Option<&FieldValue>) -> Option<&str> {
    value.and_then(FieldValue::as_text).filter(|text| !text.is_empty())
}

fn item_count(value: Option<&FieldValue>) -> usize {
    value.and_then(FieldValue::as_items).map_or(0, Vec::len)
}

/// Structural email shape check: exactly one `@`, a non-empty local part,
/// and a dotted domain. Deliverability is not this layer's concern.
fn looks_like_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

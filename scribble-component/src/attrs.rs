//! Attribute codec: DOM attribute strings ⇄ typed state fields.
//!
//! Every component type declares which of its state fields are mirrored
//! as DOM attributes and how each one is typed. Field names are camelCase,
//! attribute names are the kebab-case form of the field name:
//!
//! ```text
//! state { myAttr: 4 }   ⇄   <my-elem my-attr="4">
//! ```
//!
//! The table is built once per component type and is consulted from both
//! directions: attribute-changed notifications arrive with the kebab name,
//! state synchronisation walks the fields in declaration order.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::AttrError;

/// Declared type of an attribute-backed state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    String,
    Number,
    /// Presence-only: the attribute being set at all means `true`.
    Boolean,
    /// Serialized JSON text.
    Json,
}

/// Convert a camelCase identifier to its separated lowercase form.
///
/// Every ASCII uppercase letter is replaced by `separator` followed by the
/// letter's lowercase form, so `myAttr` becomes `my-attr` and a leading
/// capital yields a leading separator.
pub fn from_camel_case(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(separator);
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// JavaScript-style truthiness of a state value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Encode a state value as attribute text.
///
/// `None` means the attribute must be absent: a falsy boolean, or a null
/// string/number field.
pub fn encode(value: &Value, ty: AttrType) -> Option<String> {
    match ty {
        AttrType::Boolean => is_truthy(value).then(String::new),
        AttrType::String | AttrType::Number if value.is_null() => None,
        AttrType::Json => Some(value.to_string()),
        AttrType::Number => Some(match value {
            Value::Number(n) => n
                .as_f64()
                .and_then(number_value)
                .unwrap_or_else(|| value.clone())
                .to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        AttrType::String => Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

/// Decode raw attribute text (`None` when the attribute is absent).
///
/// Returns `Ok(None)` only for a number that decodes to NaN; callers drop
/// the update that produced it.
pub fn decode(raw: Option<&str>, ty: AttrType) -> Result<Option<Value>, AttrError> {
    match ty {
        AttrType::Boolean => Ok(Some(Value::Bool(raw.is_some()))),
        AttrType::String => Ok(Some(raw.map_or(Value::Null, |s| Value::String(s.to_owned())))),
        AttrType::Json => match raw {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(Some(Value::Null)),
        },
        AttrType::Number => Ok(raw.and_then(parse_float).and_then(number_value)),
    }
}

/// Parse the longest leading float prefix, after leading whitespace.
///
/// `"5px"` yields 5, `"abc"` yields nothing.
fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse::<f64>().ok();
    }

    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    let mut has_digits = int_end > end;
    if mantissa_end < bytes.len() && bytes[mantissa_end] == b'.' {
        let frac_end = digits_from(mantissa_end + 1);
        has_digits |= frac_end > mantissa_end + 1;
        mantissa_end = frac_end;
    }
    if !has_digits {
        return None;
    }

    end = mantissa_end;
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Store integral floats as integers so decoded `"5"` equals a declared `5`.
fn number_value(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(f as i64));
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

/// One attribute-backed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    /// camelCase state field name.
    pub field: String,
    /// kebab-case DOM attribute name.
    pub attribute: String,
    pub ty: AttrType,
}

/// Codec table for one component type, keyed both ways.
#[derive(Debug, Clone, Default)]
pub struct AttrTable {
    specs: Vec<AttrSpec>,
    by_attribute: FxHashMap<String, usize>,
}

impl AttrTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `field` with type `ty`. Redeclaring a field replaces its type.
    pub fn declare(&mut self, field: impl Into<String>, ty: AttrType) {
        let field = field.into();
        let attribute = from_camel_case(&field, '-');
        if let Some(&index) = self.by_attribute.get(&attribute) {
            self.specs[index].ty = ty;
            return;
        }
        self.by_attribute.insert(attribute.clone(), self.specs.len());
        self.specs.push(AttrSpec { field, attribute, ty });
    }

    pub fn by_attribute(&self, attribute: &str) -> Option<&AttrSpec> {
        self.by_attribute.get(attribute).map(|&i| &self.specs[i])
    }

    pub fn by_field(&self, field: &str) -> Option<&AttrSpec> {
        self.specs.iter().find(|spec| spec.field == field)
    }

    /// Attribute names the host should report changes for.
    pub fn observed_attributes(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.attribute.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

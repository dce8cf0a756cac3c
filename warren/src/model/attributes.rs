//! Type-tolerant getters over a resource's `attributes` object.
//!
//! The same wire field may arrive as a string, a number, a boolean, `null`,
//! or not at all depending on how the server formats it. Every getter here
//! is total: a missing key, a `null`, or a value of the wrong dynamic type
//! yields the zero value of the requested type. Mismatches are reported on
//! the `trace` log level and never surface as errors.

use serde_json::Value;
use std::collections::hash_map;
use std::collections::HashMap;
use std::collections::HashSet;
use std::iter::FromIterator;

lazy_static! {
    static ref INVALID_ATTR_FIELDS: HashSet<&'static str> =
        HashSet::from_iter(vec!["relationships", "links", "type", "id"]);
}

static NULL: Value = Value::Null;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Attributes(HashMap<String, Value>);

impl From<HashMap<String, Value>> for Attributes {
    fn from(mut map: HashMap<String, Value>) -> Self {
        for &f in &INVALID_ATTR_FIELDS as &HashSet<&str> {
            map.remove(f);
        }
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        HashMap::from_iter(iter).into()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type IntoIter = hash_map::Iter<'a, String, Value>;
    type Item = (&'a String, &'a Value);

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn drift(key: &str, expected: &str, found: &Value) {
    trace!("attribute `{}`: expected {}, found {}; using zero value", key, expected, kind(found));
}

impl Attributes {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    pub fn keys(&self) -> impl Iterator<Item = &String> { self.0.keys() }

    /// Inserts an attribute unless `key` is one of the names JSON:API reserves
    /// for the enclosing resource object.
    pub fn insert(&mut self, key: impl ToString, value: Value) -> Option<Value> {
        let key = key.to_string();
        if INVALID_ATTR_FIELDS.contains(&key.as_str()) {
            warn!("`{}` is reserved by JSON:API and cannot be an attribute, dropping it", key);
            None
        } else {
            self.0.insert(key, value)
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> { self.0.remove(key) }

    /// Raw value passthrough for opaque blobs; `null` when absent.
    pub fn any(&self, key: &str) -> &Value { self.0.get(key).unwrap_or(&NULL) }

    pub fn string(&self, key: &str) -> String {
        match self.any(key) {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => {
                drift(key, "string", other);
                String::new()
            },
        }
    }

    pub fn boolean(&self, key: &str) -> bool {
        match self.any(key) {
            Value::Bool(b) => *b,
            Value::Null => false,
            other => {
                drift(key, "boolean", other);
                false
            },
        }
    }

    /// Integer value; a fractional number is truncated toward zero.
    pub fn int(&self, key: &str) -> i64 { self.int_opt(key).unwrap_or_default() }

    pub fn int_opt(&self, key: &str) -> Option<i64> {
        match self.any(key) {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::Null => None,
            other => {
                drift(key, "number", other);
                None
            },
        }
    }

    pub fn float(&self, key: &str) -> f64 { self.float_opt(key).unwrap_or_default() }

    pub fn float_opt(&self, key: &str) -> Option<f64> {
        match self.any(key) {
            Value::Number(n) => n.as_f64(),
            Value::Null => None,
            other => {
                drift(key, "number", other);
                None
            },
        }
    }

    /// Numeric attributes are sometimes serialized as decimal strings to keep
    /// their precision; this returns either form as text.
    pub fn number_as_string(&self, key: &str) -> String {
        match self.any(key) {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => {
                drift(key, "number", other);
                String::new()
            },
        }
    }

    /// A JSON array of strings, or a lone scalar wrapped into a one-element
    /// list. Non-string array members are skipped.
    pub fn string_slice(&self, key: &str) -> Vec<String> {
        match self.any(key) {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => {
                        drift(key, "string array member", other);
                        None
                    },
                })
                .collect(),
            Value::String(s) if s.is_empty() => Vec::new(),
            Value::String(s) => vec![s.clone()],
            Value::Number(n) => vec![n.to_string()],
            Value::Bool(b) => vec![b.to_string()],
            Value::Null => Vec::new(),
            other => {
                drift(key, "array", other);
                Vec::new()
            },
        }
    }
}

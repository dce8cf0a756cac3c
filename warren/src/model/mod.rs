pub mod attributes;
pub mod document;
pub mod error;
pub mod link;
pub mod payload;
pub mod relationship;
pub mod resource;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Meta-data object, can contain any data
pub type Meta = HashMap<String, Value>;
pub type Id = String;

/// Optional `jsonapi` member identifying the JSON-API version the server implements
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonApiInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Treats an explicit `null` member like an absent one.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Looks `key` up in a meta object. Servers are inconsistent about the
/// spelling of computed meta keys, so the hyphenated and underscored forms
/// of `key` are both tried, the literal spelling first.
pub fn meta_value<'a>(meta: &'a Meta, key: &str) -> Option<&'a Value> {
    if let Some(value) = meta.get(key) {
        return Some(value);
    }
    let alternate = if key.contains('-') { key.replace('-', "_") } else { key.replace('_', "-") };
    if alternate == key {
        None
    } else {
        meta.get(&alternate)
    }
}

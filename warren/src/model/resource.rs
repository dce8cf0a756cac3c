use crate::model::attributes::Attributes;
use crate::model::link::Links;
use crate::model::relationship::{Relationship, Relationships};
use crate::model::{null_as_default, Id, Meta};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

pub type ResourceIdentifiers = Vec<ResourceIdentifier>;
pub type Resources = Vec<Resource>;

/// Linkage carried by a relationship's `data` member.
///
/// `Single(None)` is `"data": null` and `Multiple(vec![])` is `"data": []`.
/// The two are distinct: one says "no related resource", the
/// other "a to-many relationship that currently has no members".
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(untagged)]
pub enum IdentifierData {
    Single(Option<ResourceIdentifier>),
    Multiple(ResourceIdentifiers),
}

impl IdentifierData {
    pub fn data(&self) -> Vec<ResourceIdentifier> {
        match self {
            IdentifierData::Single(Some(data)) => vec![data.clone()],
            IdentifierData::Single(None) => Default::default(),
            IdentifierData::Multiple(data) => data.clone(),
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, IdentifierData::Single(None)) }

    pub fn is_to_many(&self) -> bool { matches!(self, IdentifierData::Multiple(_)) }
}

impl Default for IdentifierData {
    fn default() -> Self { IdentifierData::Single(None) }
}

impl<'de> Deserialize<'de> for IdentifierData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(IdentifierData::Single(None)),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(|id| IdentifierData::Single(Some(id)))
                .map_err(D::Error::custom),
            value @ Value::Array(_) => {
                serde_json::from_value(value).map(IdentifierData::Multiple).map_err(D::Error::custom)
            },
            other => Err(D::Error::custom(format!(
                "relationship `data` must be null, an object or an array, found `{}`",
                other
            ))),
        }
    }
}

/// Resource Identifier
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub ty: String,
    pub id: Id,
}

impl ResourceIdentifier {
    pub fn new(ty: impl ToString, id: impl ToString) -> Self {
        Self { ty: ty.to_string(), id: id.to_string() }
    }
}

/// JSON-API Resource
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub ty: String,
    pub id: Id,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Relationships,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

impl Resource {
    pub fn identifier(&self) -> ResourceIdentifier { ResourceIdentifier::new(&self.ty, &self.id) }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> { self.relationships.get(name) }

    /// Id of a to-one relationship, `""` when it is absent, null or to-many.
    pub fn relationship_id(&self, name: &str) -> String {
        match self.relationship(name).map(|r| &r.data) {
            Some(IdentifierData::Single(Some(data))) => data.id.clone(),
            _ => String::new(),
        }
    }

    /// Ids of a relationship in linkage order; a to-one relationship yields
    /// at most one id.
    pub fn relationship_ids(&self, name: &str) -> Vec<String> {
        self.relationship(name)
            .map(|r| r.data.data().into_iter().map(|d| d.id).collect())
            .unwrap_or_default()
    }

    pub fn meta_value(&self, key: &str) -> Option<&Value> { crate::model::meta_value(&self.meta, key) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifier_data_keeps_null_and_empty_apart() {
        let null: IdentifierData = serde_json::from_value(json!(null)).unwrap();
        let empty: IdentifierData = serde_json::from_value(json!([])).unwrap();
        assert!(null.is_null());
        assert!(!null.is_to_many());
        assert!(empty.is_to_many());
        assert!(!empty.is_null());
        assert_ne!(null, empty);
    }

    #[test]
    fn identifier_data_rejects_scalars() {
        assert!(serde_json::from_value::<IdentifierData>(json!("users/9")).is_err());
        assert!(serde_json::from_value::<IdentifierData>(json!(["users", "9"])).is_err());
    }

    #[test]
    fn null_members_decode_as_empty() {
        let resource: Resource = serde_json::from_value(json!({
            "type": "widgets", "id": "1", "attributes": null, "relationships": null, "meta": null
        }))
        .unwrap();
        assert!(resource.attributes.is_empty());
        assert!(resource.relationships.is_empty());
        assert!(resource.meta.is_empty());
    }

    #[test]
    fn relationship_ids_by_name() {
        let resource: Resource = serde_json::from_value(json!({
            "type": "jobs", "id": "1",
            "relationships": {
                "trucker": { "data": { "type": "truckers", "id": "4" } },
                "shifts": { "data": [ { "type": "shifts", "id": "7" }, { "type": "shifts", "id": "8" } ] },
                "broker": { "data": null }
            }
        }))
        .unwrap();
        assert_eq!(resource.relationship_id("trucker"), "4");
        assert_eq!(resource.relationship_id("shifts"), "");
        assert_eq!(resource.relationship_id("broker"), "");
        assert_eq!(resource.relationship_id("missing"), "");
        assert_eq!(resource.relationship_ids("shifts"), vec!["7", "8"]);
        assert_eq!(resource.relationship_ids("trucker"), vec!["4"]);
        assert!(resource.relationship_ids("broker").is_empty());
    }
}

use crate::model::link::{Link, Links};
use crate::model::resource::{IdentifierData, ResourceIdentifier};
use crate::model::{null_as_default, Meta};
use std::collections::HashMap;

pub type Relationships = HashMap<String, Relationship>;

/// Relationship with another object
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Relationship {
    /// A relationship object may carry only links; missing linkage reads as `null`.
    #[serde(default)]
    pub data: IdentifierData,
    #[serde(skip_serializing_if = "RelationshipLinks::is_not_valid")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: RelationshipLinks,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

impl Relationship {
    pub fn to_one(id: Option<ResourceIdentifier>) -> Self {
        Self { data: IdentifierData::Single(id), ..Default::default() }
    }

    pub fn to_many(ids: Vec<ResourceIdentifier>) -> Self {
        Self { data: IdentifierData::Multiple(ids), ..Default::default() }
    }

    pub fn is_null(&self) -> bool { self.data.is_null() }

    pub fn is_to_many(&self) -> bool { self.data.is_to_many() }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RelationshipLinks {
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    slf: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    related: Option<Link>,
    #[serde(flatten)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    links: Links,
}

impl RelationshipLinks {
    pub fn is_valid(&self) -> bool { !(self.slf.is_none() && self.related.is_none()) }

    fn is_not_valid(&self) -> bool { !self.is_valid() }

    pub fn get(&self, key: impl ToString) -> Option<&Link> {
        let key = key.to_string();
        if key == "self" {
            self.slf.as_ref()
        } else if key == "related" {
            self.related.as_ref()
        } else {
            self.links.get(&key)
        }
    }
}

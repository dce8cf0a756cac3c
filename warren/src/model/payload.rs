//! Request bodies for `POST /<ty>` and `PATCH /<ty>/<id>`.

use crate::error::WarrenError;
use crate::model::attributes::Attributes;
use crate::model::relationship::{Relationship, Relationships};
use crate::model::resource::ResourceIdentifier;
use crate::model::Id;
use crate::query::filter::unique_trimmed;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub relationships: Relationships,
}

/// `{"data": <resource object>}`
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ResourcePayload {
    pub data: ResourceObject,
}

impl ResourcePayload {
    /// Payload for creating a resource; the server assigns the id.
    pub fn new(ty: impl ToString) -> Self {
        Self { data: ResourceObject { ty: ty.to_string(), ..Default::default() } }
    }

    /// Payload for updating the resource `id`.
    pub fn update(ty: impl ToString, id: impl ToString) -> Self {
        let mut payload = Self::new(ty);
        payload.data.id = Some(id.to_string());
        payload
    }

    pub fn ty(&self) -> &str { &self.data.ty }

    pub fn id(&self) -> Option<&str> { self.data.id.as_deref() }

    /// No attribute and no relationship set.
    pub fn is_empty(&self) -> bool {
        self.data.attributes.is_empty() && self.data.relationships.is_empty()
    }

    pub fn attribute(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.data.attributes.insert(key, value.into());
        self
    }

    /// Sets a string attribute only when it is non-empty after trimming, so an
    /// unset flag never overwrites server state with `""`.
    pub fn attribute_if_present(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.data.attributes.insert(key, Value::String(value.to_string()));
        }
        self
    }

    pub fn bool_if_present(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.data.attributes.insert(key, Value::Bool(value));
        }
        self
    }

    /// Sets a to-one relationship when `id` is non-empty.
    pub fn relationship_if_present(&mut self, name: &str, ty: &str, id: &str) -> &mut Self {
        let id = id.trim();
        if !id.is_empty() {
            self.data.relationships.insert(
                name.to_string(),
                Relationship::to_one(Some(ResourceIdentifier::new(ty, id))),
            );
        }
        self
    }

    /// Replaces a to-many relationship. An empty `ids` clears every member
    /// and is sent as `"data": []`.
    pub fn relationship_list<S: AsRef<str>>(&mut self, name: &str, ty: &str, ids: &[S]) -> &mut Self {
        let data =
            unique_trimmed(ids).into_iter().map(|id| ResourceIdentifier::new(ty, id)).collect();
        self.data.relationships.insert(name.to_string(), Relationship::to_many(data));
        self
    }

    /// Removes a to-one relationship by sending `"data": null`.
    pub fn clear_relationship(&mut self, name: &str) -> &mut Self {
        self.data.relationships.insert(name.to_string(), Relationship::to_one(None));
        self
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, WarrenError> {
        serde_json::to_vec(self).map_err(WarrenError::Serialize)
    }
}

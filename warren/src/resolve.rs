//! Cross-references relationship linkage against a document's `included`
//! resources to produce display labels.
//!
//! A relationship whose target was not included is not an error: the id is
//! always available and the label falls back to it.

use crate::display::format_polymorphic;
use crate::model::relationship::Relationship;
use crate::model::resource::{IdentifierData, Resource, ResourceIdentifier};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A to-one relationship after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub ty: String,
    pub id: String,
    /// A preferred attribute of the included target, or the bare id.
    pub label: String,
    /// Whether the target was found in `included`.
    pub found: bool,
}

impl Resolved {
    fn unresolved(identifier: &ResourceIdentifier) -> Self {
        Self {
            ty: identifier.ty.clone(),
            id: identifier.id.clone(),
            label: identifier.id.clone(),
            found: false,
        }
    }

    /// `true` for a null or absent relationship.
    pub fn is_empty(&self) -> bool { self.id.is_empty() }

    /// Label for a polymorphic relationship: the resolved label when one was
    /// found, otherwise `Type/ID`.
    pub fn polymorphic_label(&self) -> String {
        if self.is_empty() {
            String::new()
        } else if self.found && self.label != self.id {
            self.label.clone()
        } else {
            format_polymorphic(&self.ty, &self.id)
        }
    }
}

/// First non-empty attribute from `preferences`, else the resource id.
pub fn label(resource: &Resource, preferences: &[&str]) -> String {
    preferences
        .iter()
        .map(|key| resource.attributes.string(key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| resource.id.clone())
}

/// `(type, id) -> resource` over a document's `included` list. Borrows the
/// resources; built per response and never shared.
#[derive(Debug, Default)]
pub struct IncludedIndex<'a> {
    map: HashMap<(&'a str, &'a str), &'a Resource>,
}

pub fn build_index(included: &[Resource]) -> IncludedIndex<'_> { IncludedIndex::new(included) }

impl<'a> IncludedIndex<'a> {
    /// One pass over `included`; on a duplicate `(type, id)` the first
    /// occurrence is kept.
    pub fn new(included: &'a [Resource]) -> Self {
        let mut map = HashMap::with_capacity(included.len());
        for resource in included {
            match map.entry((resource.ty.as_str(), resource.id.as_str())) {
                Entry::Vacant(entry) => {
                    entry.insert(resource);
                },
                Entry::Occupied(_) => {
                    debug!("duplicate included {}/{}, keeping the first", resource.ty, resource.id);
                },
            }
        }
        Self { map }
    }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn get(&self, identifier: &ResourceIdentifier) -> Option<&'a Resource> {
        self.get_by(&identifier.ty, &identifier.id)
    }

    /// The `type` carried on the linkage selects the collection searched, so a
    /// polymorphic relationship needs nothing beyond its identifier.
    pub fn get_by(&self, ty: &str, id: &str) -> Option<&'a Resource> {
        self.map.get(&(ty, id)).copied()
    }

    fn resolve_identifier(&self, identifier: &ResourceIdentifier, preferences: &[&str]) -> Resolved {
        match self.get(identifier) {
            Some(target) => Resolved {
                ty: identifier.ty.clone(),
                id: identifier.id.clone(),
                label: label(target, preferences),
                found: true,
            },
            None => Resolved::unresolved(identifier),
        }
    }

    /// Resolves a to-one relationship. An absent or null relationship gives
    /// empty id and label; so does a to-many one, which has no single target.
    pub fn resolve_to_one(
        &self, relationship: Option<&Relationship>, preferences: &[&str],
    ) -> Resolved {
        match relationship.map(|r| &r.data) {
            Some(IdentifierData::Single(Some(identifier))) => {
                self.resolve_identifier(identifier, preferences)
            },
            _ => Resolved::default(),
        }
    }

    /// Raw ids of a to-many relationship. `None` means the relationship is
    /// absent or `null`; `Some(vec![])` means it is present and empty.
    pub fn resolve_to_many(&self, relationship: Option<&Relationship>) -> Option<Vec<String>> {
        match relationship.map(|r| &r.data) {
            Some(IdentifierData::Multiple(ids)) => Some(ids.iter().map(|i| i.id.clone()).collect()),
            Some(IdentifierData::Single(Some(identifier))) => Some(vec![identifier.id.clone()]),
            _ => None,
        }
    }

    /// Resolves every member of a relationship, in linkage order.
    pub fn resolve_many_labels(
        &self, relationship: Option<&Relationship>, preferences: &[&str],
    ) -> Vec<Resolved> {
        relationship
            .map(|r| r.data.data())
            .unwrap_or_default()
            .iter()
            .map(|identifier| self.resolve_identifier(identifier, preferences))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resources(value: serde_json::Value) -> Vec<Resource> { serde_json::from_value(value).unwrap() }

    #[test]
    fn duplicates_keep_the_first_occurrence() {
        let included = resources(json!([
            { "type": "users", "id": "9", "attributes": { "name": "Ann" } },
            { "type": "users", "id": "9", "attributes": { "name": "Impostor" } },
            { "type": "brokers", "id": "9", "attributes": { "company-name": "Acme" } },
        ]));
        let index = build_index(&included);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get_by("users", "9").unwrap().attributes.string("name"), "Ann");
        assert!(index.get_by("Users", "9").is_none());
    }

    #[test]
    fn preference_order_then_id() {
        let included = resources(json!([
            { "type": "customers", "id": "3", "attributes": { "company-name": "", "name": "Bo" } },
            { "type": "customers", "id": "4", "attributes": { "company-name": "Dirt Co", "name": "Cy" } },
            { "type": "customers", "id": "5", "attributes": {} },
        ]));
        let prefs = &["company-name", "name"];
        assert_eq!(label(&included[0], prefs), "Bo");
        assert_eq!(label(&included[1], prefs), "Dirt Co");
        assert_eq!(label(&included[2], prefs), "5");
    }

    #[test]
    fn polymorphic_targets_resolve_by_their_own_type() {
        let included = resources(json!([
            { "type": "brokers", "id": "1", "attributes": { "company-name": "Haulers" } },
        ]));
        let index = build_index(&included);
        let broker: Relationship =
            serde_json::from_value(json!({ "data": { "type": "brokers", "id": "1" } })).unwrap();
        let customer: Relationship =
            serde_json::from_value(json!({ "data": { "type": "customers", "id": "1" } })).unwrap();

        let resolved = index.resolve_to_one(Some(&broker), &["company-name"]);
        assert!(resolved.found);
        assert_eq!(resolved.polymorphic_label(), "Haulers");

        let resolved = index.resolve_to_one(Some(&customer), &["company-name"]);
        assert!(!resolved.found);
        assert_eq!(resolved.label, "1");
        assert_eq!(resolved.polymorphic_label(), "customers/1");
    }

    #[test]
    fn to_many_labels_follow_linkage_order() {
        let included = resources(json!([
            { "type": "tags", "id": "2", "attributes": { "name": "urgent" } },
        ]));
        let index = build_index(&included);
        let tags: Relationship = serde_json::from_value(json!({
            "data": [ { "type": "tags", "id": "1" }, { "type": "tags", "id": "2" } ]
        }))
        .unwrap();
        let labels: Vec<String> =
            index.resolve_many_labels(Some(&tags), &["name"]).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["1", "urgent"]);
        assert_eq!(index.resolve_to_many(Some(&tags)), Some(vec!["1".to_string(), "2".to_string()]));
        assert!(index.resolve_to_one(Some(&tags), &["name"]).is_empty());
        assert_eq!(index.resolve_to_many(None), None);
    }
}

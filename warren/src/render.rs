//! Sparse-field passthrough: renders exactly the fields a caller asked for,
//! in the order asked, straight from the raw document.

use crate::display::format_any_value;
use crate::model::document::Document;
use crate::model::resource::{IdentifierData, Resource};
use crate::query::filter::unique_trimmed;
use itertools::Itertools;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// A caller's requested field list: trimmed, non-empty, first occurrence
/// wins, requested order kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseFields(Vec<String>);

impl SparseFields {
    pub fn parse(raw: &str) -> Self { SparseFields(unique_trimmed(&raw.split(',').collect::<Vec<_>>())) }

    /// `None` unless the flag was given and names at least one field.
    pub fn from_flag(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::parse).filter(|fields| !fields.is_empty())
    }

    pub fn names(&self) -> &[String] { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SparseValue {
    Attribute(Value),
    Relationship(IdentifierData),
}

impl SparseValue {
    /// Attributes through `format_any_value`; relationships as their raw ids,
    /// `-` for a null linkage.
    pub fn display(&self) -> String {
        match self {
            SparseValue::Attribute(value) => format_any_value(value),
            SparseValue::Relationship(IdentifierData::Single(None)) => "-".to_string(),
            SparseValue::Relationship(data) => data.data().iter().map(|i| i.id.as_str()).join(","),
        }
    }
}

impl Serialize for SparseValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SparseValue::Attribute(value) => value.serialize(serializer),
            SparseValue::Relationship(data) => data.serialize(serializer),
        }
    }
}

/// One resource projected onto the requested fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRow {
    pub ty: String,
    pub id: String,
    pub fields: Vec<(String, SparseValue)>,
}

impl SparseRow {
    /// No requested field was found on the resource.
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn get(&self, name: &str) -> Option<&SparseValue> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    pub fn names(&self) -> Vec<&str> { self.fields.iter().map(|(name, _)| name.as_str()).collect() }
}

/// `{"id", "type", <fields in requested order>}`
impl Serialize for SparseRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", &self.ty)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseProjection {
    pub requested: SparseFields,
    /// One row per primary resource, in `data` order.
    pub rows: Vec<SparseRow>,
    /// Requested names found on none of the rows.
    pub unknown_fields: Vec<String>,
}

impl SparseProjection {
    /// Requested names present on at least one row, in requested order.
    pub fn columns(&self) -> Vec<&str> {
        self.requested
            .names()
            .iter()
            .map(String::as_str)
            .filter(|name| !self.unknown_fields.iter().any(|unknown| unknown == name))
            .collect()
    }

    pub fn is_empty(&self) -> bool { self.rows.iter().all(SparseRow::is_empty) }
}

/// Projects one resource. Each name is looked up in `attributes` first, then
/// in `relationships`; the names matching neither are returned beside the
/// row.
pub fn project(resource: &Resource, fields: &SparseFields) -> (SparseRow, Vec<String>) {
    let mut row = SparseRow {
        ty: resource.ty.clone(),
        id: resource.id.clone(),
        fields: Vec::with_capacity(fields.len()),
    };
    let mut missing = Vec::new();
    for name in fields.names() {
        if let Some(value) = resource.attributes.get(name) {
            row.fields.push((name.clone(), SparseValue::Attribute(value.clone())));
        } else if let Some(relationship) = resource.relationships.get(name) {
            row.fields.push((name.clone(), SparseValue::Relationship(relationship.data.clone())));
        } else {
            missing.push(name.clone());
        }
    }
    (row, missing)
}

/// Projects every primary resource of `document`. Unknown names never fail
/// the render: they are omitted and logged once each.
pub fn render(document: &Document, fields: &SparseFields) -> SparseProjection {
    let mut rows = Vec::with_capacity(document.resources().len());
    let mut seen_anywhere: Vec<&str> = Vec::new();
    for resource in document.resources() {
        let (row, _) = project(resource, fields);
        for name in fields.names() {
            if row.get(name).is_some() && !seen_anywhere.contains(&name.as_str()) {
                seen_anywhere.push(name);
            }
        }
        rows.push(row);
    }

    let unknown_fields: Vec<String> =
        fields.names().iter().filter(|name| !seen_anywhere.contains(&name.as_str())).cloned().collect();
    for name in &unknown_fields {
        warn!("unknown field `{}`: not an attribute or relationship of any returned resource", name);
    }

    SparseProjection { requested: fields.clone(), rows, unknown_fields }
}

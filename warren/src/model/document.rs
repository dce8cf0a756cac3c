use crate::error::WarrenError;
use crate::model::error::Errors;
use crate::model::link::{Links, Pagination};
use crate::model::resource::{Resource, Resources};
use crate::model::{JsonApiInfo, Meta};
use crate::resolve::IncludedIndex;
use core::fmt;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Flat list of every resource embedded alongside the primary data, in the
/// order the server sent them. Duplicates are kept here and resolved by
/// [`IncludedIndex`].
pub type Included = Vec<Resource>;

static NO_DATA: PrimaryData = PrimaryData::Null;

/// The polymorphic top-level `data` member, resolved once at decode time.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PrimaryData {
    Single(Box<Resource>),
    Multiple(Resources),
    Null,
}

impl PrimaryData {
    pub fn resources(&self) -> &[Resource] {
        match self {
            PrimaryData::Single(res) => std::slice::from_ref(res.as_ref()),
            PrimaryData::Multiple(vec) => vec,
            PrimaryData::Null => &[],
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            PrimaryData::Single(_) => "a single resource",
            PrimaryData::Multiple(_) => "a resource collection",
            PrimaryData::Null => "null",
        }
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(PrimaryData::Null),
            value @ Value::Object(_) => {
                serde_json::from_value::<Resource>(value).map(|r| PrimaryData::Single(Box::new(r)))
            },
            value @ Value::Array(_) => {
                serde_json::from_value::<Resources>(value).map(PrimaryData::Multiple)
            },
            other => Err(serde_json::Error::custom(format!(
                "field `data` must be null, an object or an array, found `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentItem {
    PrimaryData(PrimaryData, Included),
    Errors(Errors),
}

impl Default for DocumentItem {
    fn default() -> Self { DocumentItem::PrimaryData(PrimaryData::Null, Default::default()) }
}

/// A top-level JSON:API document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub item: DocumentItem,
    pub links: Links,
    pub meta: Meta,
    pub jsonapi: Option<JsonApiInfo>,
}

impl Document {
    /// Decodes a response body. Unparsable JSON and structurally invalid
    /// documents are both reported with the raw body attached.
    pub fn from_slice(body: &[u8]) -> Result<Self, WarrenError> {
        serde_json::from_slice(body).map_err(|source| WarrenError::Decode {
            source,
            body: String::from_utf8_lossy(body).into_owned(),
        })
    }

    pub fn single_resource(resource: Resource, included: Included) -> Self {
        Self {
            item: DocumentItem::PrimaryData(PrimaryData::Single(Box::new(resource)), included),
            ..Default::default()
        }
    }

    pub fn multiple_resources(resources: Vec<Resource>, included: Included) -> Self {
        Self {
            item: DocumentItem::PrimaryData(PrimaryData::Multiple(resources), included),
            ..Default::default()
        }
    }

    pub fn data(&self) -> &PrimaryData {
        match &self.item {
            DocumentItem::PrimaryData(data, _) => data,
            DocumentItem::Errors(_) => &NO_DATA,
        }
    }

    /// Primary resources in server order; one element for a single-resource
    /// document, none for `null`.
    pub fn resources(&self) -> &[Resource] { self.data().resources() }

    pub fn included(&self) -> &[Resource] {
        match &self.item {
            DocumentItem::PrimaryData(_, included) => included,
            DocumentItem::Errors(_) => &[],
        }
    }

    pub fn errors(&self) -> Option<&Errors> {
        match &self.item {
            DocumentItem::Errors(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match &self.item {
            DocumentItem::PrimaryData(data, _) => data.shape(),
            DocumentItem::Errors(_) => "an error document",
        }
    }

    /// Index over `included` borrowed from this document.
    pub fn index(&self) -> IncludedIndex<'_> { IncludedIndex::new(self.included()) }

    pub fn pagination(&self) -> Pagination { Pagination::from_links(&self.links) }

    pub fn meta_value(&self, key: &str) -> Option<&Value> { crate::model::meta_value(&self.meta, key) }

    pub fn into_single(self) -> Result<(Resource, Included), WarrenError> {
        match self.into_optional_single()? {
            Some(pair) => Ok(pair),
            None => Err(WarrenError::UnexpectedData { expected: "a single resource", found: "null" }),
        }
    }

    /// Like [`Document::into_single`] but accepts `"data": null`, the answer
    /// to a to-one fetch whose target does not exist.
    pub fn into_optional_single(self) -> Result<Option<(Resource, Included)>, WarrenError> {
        let found = self.shape();
        match self.item {
            DocumentItem::PrimaryData(PrimaryData::Single(resource), included) => {
                Ok(Some((*resource, included)))
            },
            DocumentItem::PrimaryData(PrimaryData::Null, _) => Ok(None),
            DocumentItem::Errors(errors) => Err(WarrenError::ErrorDocument(errors)),
            _ => Err(WarrenError::UnexpectedData { expected: "a single resource", found }),
        }
    }

    pub fn into_collection(self) -> Result<(Resources, Included), WarrenError> {
        let found = self.shape();
        match self.item {
            DocumentItem::PrimaryData(PrimaryData::Multiple(resources), included) => {
                Ok((resources, included))
            },
            DocumentItem::Errors(errors) => Err(WarrenError::ErrorDocument(errors)),
            _ => Err(WarrenError::UnexpectedData { expected: "a resource collection", found }),
        }
    }

    /// Fails unless the primary data has the requested shape; the document is
    /// handed back untouched so callers keep `links` and `meta`.
    pub fn expect_collection(self) -> Result<Self, WarrenError> {
        match &self.item {
            DocumentItem::PrimaryData(PrimaryData::Multiple(_), _) => {},
            DocumentItem::Errors(errors) => return Err(WarrenError::ErrorDocument(errors.clone())),
            _ => {
                return Err(WarrenError::UnexpectedData {
                    expected: "a resource collection",
                    found: self.shape(),
                })
            },
        }
        Ok(self)
    }

    pub fn expect_single(self) -> Result<Self, WarrenError> {
        match &self.item {
            DocumentItem::PrimaryData(PrimaryData::Single(_), _) => {},
            DocumentItem::Errors(errors) => return Err(WarrenError::ErrorDocument(errors.clone())),
            _ => {
                return Err(WarrenError::UnexpectedData {
                    expected: "a single resource",
                    found: self.shape(),
                })
            },
        }
        Ok(self)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Document", 5)?;
        match self.item {
            DocumentItem::PrimaryData(ref data, ref included) => {
                state.serialize_field("data", data)?;
                if !included.is_empty() {
                    state.serialize_field("included", included)?;
                }
            },
            DocumentItem::Errors(ref errors) => {
                state.serialize_field("errors", errors)?;
            },
        }

        if !self.links.is_empty() {
            state.serialize_field("links", &self.links)?;
        }
        if !self.meta.is_empty() {
            state.serialize_field("meta", &self.meta)?;
        }
        if let Some(ref jsonapi) = self.jsonapi {
            state.serialize_field("jsonapi", jsonapi)?;
        }

        state.end()
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a JSON Object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut links = None;
        let mut meta = None;
        let mut jsonapi = None;
        let mut data = None;
        let mut included = None;
        let mut errors = None;

        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            match key.as_str() {
                "links" if links.is_none() => match serde_json::from_value::<Option<Links>>(value) {
                    Ok(new_data) => links = Some(new_data.unwrap_or_default()),
                    Err(err) => return Err(A::Error::custom(err)),
                },
                "links" => return Err(A::Error::duplicate_field("links")),
                "meta" if meta.is_none() => match serde_json::from_value::<Option<Meta>>(value) {
                    Ok(new_data) => meta = Some(new_data.unwrap_or_default()),
                    Err(err) => return Err(A::Error::custom(err)),
                },
                "meta" => return Err(A::Error::duplicate_field("meta")),
                "jsonapi" if jsonapi.is_none() => {
                    match serde_json::from_value::<JsonApiInfo>(value) {
                        Ok(new_data) => jsonapi = Some(new_data),
                        Err(err) => return Err(A::Error::custom(err)),
                    }
                },
                "jsonapi" => return Err(A::Error::duplicate_field("jsonapi")),
                "data" if data.is_none() => match PrimaryData::from_value(value) {
                    Ok(new_data) => data = Some(new_data),
                    Err(err) => return Err(A::Error::custom(err)),
                },
                "data" => return Err(A::Error::duplicate_field("data")),
                "included" if included.is_none() => {
                    match serde_json::from_value::<Option<Included>>(value) {
                        Ok(new_data) => included = Some(new_data.unwrap_or_default()),
                        Err(err) => return Err(A::Error::custom(err)),
                    }
                },
                "included" => return Err(A::Error::duplicate_field("included")),
                "errors" if errors.is_none() => match serde_json::from_value::<Errors>(value) {
                    Ok(new_data) => errors = Some(new_data),
                    Err(err) => return Err(A::Error::custom(err)),
                },
                "errors" => return Err(A::Error::duplicate_field("errors")),
                _ => {},
            }
        }

        let item = match (data, included, errors) {
            (Some(data), included, None) => {
                DocumentItem::PrimaryData(data, included.unwrap_or_default())
            },
            (None, None, Some(errors)) => DocumentItem::Errors(errors),
            (None, Some(_), _) => {
                return Err(A::Error::custom("field `included` cannot exist without `data`"));
            },
            // A meta-only document carries no primary data at all.
            (None, None, None) => DocumentItem::default(),
            (Some(_), _, Some(_)) => {
                return Err(A::Error::custom(
                    "field `data` and `errors` cannot exists in the same document",
                ));
            },
        };

        Ok(Document {
            item,
            links: links.unwrap_or_default(),
            meta: meta.unwrap_or_default(),
            jsonapi,
        })
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_does_not_omit_an_empty_primary_data() {
        let doc = Document::default();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"data":null}"#);
    }

    #[test]
    fn it_omits_empty_document_and_primary_data_keys() {
        let resource = Resource { ty: "test".into(), id: "123".into(), ..Default::default() };
        let doc = Document::single_resource(resource, Default::default());
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"data":{"type":"test","id":"123"}}"#);
    }

    #[test]
    fn data_and_errors_are_exclusive() {
        let body = br#"{"data":null,"errors":[{"title":"x"}]}"#;
        assert!(matches!(Document::from_slice(body), Err(WarrenError::Decode { .. })));
    }

    #[test]
    fn included_requires_data() {
        let body = br#"{"included":[]}"#;
        assert!(matches!(Document::from_slice(body), Err(WarrenError::Decode { .. })));
    }

    #[test]
    fn scalar_data_is_a_decode_error() {
        let err = Document::from_slice(br#"{"data":"widgets"}"#).unwrap_err();
        match err {
            WarrenError::Decode { body, .. } => assert_eq!(body, r#"{"data":"widgets"}"#),
            other => unreachable!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn meta_only_document() {
        let doc = Document::from_slice(br#"{"meta":{"total-count":12}}"#).unwrap();
        assert_eq!(doc.data(), &PrimaryData::Null);
        assert_eq!(doc.meta_value("total_count"), Some(&json!(12)));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let doc = Document::from_slice(br#"{"data":{"type":"widgets","id":"1"}}"#).unwrap();
        match doc.into_collection() {
            Err(WarrenError::UnexpectedData { expected, found }) => {
                assert_eq!(expected, "a resource collection");
                assert_eq!(found, "a single resource");
            },
            other => unreachable!("unexpected result: {:?}", other),
        }

        let doc = Document::from_slice(br#"{"data":[]}"#).unwrap();
        assert!(doc.clone().into_single().is_err());
        assert!(doc.expect_collection().is_ok());
    }

    #[test]
    fn null_data_is_an_absent_single() {
        let doc = Document::from_slice(br#"{"data":null}"#).unwrap();
        assert!(doc.clone().into_optional_single().unwrap().is_none());
        assert!(doc.into_single().is_err());
    }

    #[test]
    fn error_documents_surface_their_errors() {
        let doc = Document::from_slice(br#"{"errors":[{"status":"422","title":"Invalid"}]}"#).unwrap();
        assert_eq!(doc.errors().map(Vec::len), Some(1));
        assert!(doc.resources().is_empty());
        assert!(matches!(doc.into_collection(), Err(WarrenError::ErrorDocument(_))));
    }
}

use crate::error::WarrenError;
use crate::model::Meta;
use std::collections::HashMap;

pub type Links = HashMap<String, Link>;

/// A link is either a bare URL string or an object with `href` and
/// optional `meta`. JSON:API allows `null` to say a link is unavailable
/// (e.g. `next` on the last page).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Link {
    Raw(String),
    Object {
        href: String,
        #[serde(default)]
        #[serde(skip_serializing_if = "HashMap::is_empty")]
        meta: Meta,
    },
    Null,
}

impl Link {
    pub fn href(&self) -> Option<&str> {
        match self {
            Link::Raw(raw) => Some(raw),
            Link::Object { href, .. } => Some(href),
            Link::Null => None,
        }
    }

    pub fn uri(&self) -> Result<Option<http::Uri>, WarrenError> {
        self.href()
            .map(|href| {
                href.parse::<http::Uri>().map_err(|err| WarrenError::InvalidUri(href.into(), err))
            })
            .transpose()
    }
}

/// Pagination links of a collection document
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pagination {
    pub first: Option<Link>,
    pub prev: Option<Link>,
    pub next: Option<Link>,
    pub last: Option<Link>,
}

impl Pagination {
    pub fn from_links(links: &Links) -> Self {
        let pick = |key: &str| links.get(key).filter(|l| l.href().is_some()).cloned();
        Self { first: pick("first"), prev: pick("prev"), next: pick("next"), last: pick("last") }
    }

    pub fn has_next(&self) -> bool { self.next.is_some() }
}

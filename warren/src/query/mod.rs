pub mod filter;
pub mod page;
pub mod sort;

use crate::query::filter::{unique_trimmed, FilterQuery};
use crate::query::page::PageQuery;
use crate::query::sort::SortQuery;
use crate::Result;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

pub type IncludeQuery = Vec<String>;
pub type FieldsQuery = BTreeMap<String, Vec<String>>;

/// Bytes escaped inside a query key or value. `[`, `]` and `,` stay
/// literal so `fields[users]=name,email` reads the way servers document it.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

lazy_static! {
    static ref KEY_REGEX: Regex = Regex::new(r#"^(?P<name>\w+)\[(?P<param>[^\[\]]+)\]$"#).unwrap();
}

/// The query half of a collection or resource request.
///
/// Built with chained `&mut self` setters and serialized deterministically:
/// two equal queries always produce byte-identical strings, whatever order
/// their parts were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: FilterQuery,
    /// A type mapped to an empty list asks for no fields of that type and is
    /// sent as `fields[<type>]=`.
    pub fields: FieldsQuery,
    pub include: IncludeQuery,
    pub sort: SortQuery,
    pub page: PageQuery,
    /// Parameters outside the JSON:API families, sent as given.
    pub extra: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self { Default::default() }

    pub fn filter(&mut self, name: &str, value: &str) -> &mut Self {
        self.filter.insert(name, value);
        self
    }

    pub fn filters<'a, I>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in filters {
            self.filter.insert(name, value);
        }
        self
    }

    pub fn filter_list<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> &mut Self {
        self.filter.insert_list(name, values);
        self
    }

    pub fn filter_polymorphic(&mut self, name: &str, ty: &str, id: &str) -> &mut Self {
        self.filter.insert_polymorphic(name, ty, id);
        self
    }

    pub fn fields<S: AsRef<str>>(&mut self, ty: &str, names: &[S]) -> &mut Self {
        let ty = ty.trim();
        if ty.is_empty() {
            return self;
        }
        let entry = self.fields.entry(ty.to_string()).or_default();
        for name in unique_trimmed(names) {
            if !entry.contains(&name) {
                entry.push(name);
            }
        }
        self
    }

    pub fn include<S: AsRef<str>>(&mut self, paths: &[S]) -> &mut Self {
        for path in unique_trimmed(paths) {
            if !self.include.contains(&path) {
                self.include.push(path);
            }
        }
        self
    }

    pub fn sort(&mut self, sort: &str) -> &mut Self {
        self.sort = SortQuery::new(sort);
        self
    }

    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.page.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.page.offset = offset;
        self
    }

    pub fn param(&mut self, key: &str, value: &str) -> &mut Self {
        let (key, value) = (key.trim(), value.trim());
        if !key.is_empty() && !value.is_empty() {
            self.extra.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool { self.pairs().is_empty() }

    /// Every parameter as an unencoded `(key, value)` pair, sorted by key.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: BTreeMap<String, String> = self.extra.clone();
        pairs.extend(self.filter.pairs());
        for (ty, names) in &self.fields {
            pairs.insert(format!("fields[{}]", ty), names.join(","));
        }
        if !self.include.is_empty() {
            pairs.insert("include".into(), self.include.join(","));
        }
        if !self.sort.is_empty() {
            pairs.insert("sort".into(), self.sort.as_str().to_string());
        }
        pairs.extend(self.page.pairs());
        pairs.into_iter().collect()
    }

    /// The encoded query string, without a leading `?`.
    pub fn to_query_string(&self) -> String { encode_pairs(&self.pairs()) }

    pub fn from_uri(uri: &http::Uri) -> Result<Query> {
        uri.query().map(Self::from_query_str).unwrap_or_else(|| Ok(Query::default()))
    }

    /// Parses the query half of a link such as a document's `links.next`.
    /// Servers often leave brackets unescaped, which a strict URI parser
    /// rejects, so the href is split by hand.
    pub fn from_link(href: &str) -> Result<Query> {
        let href = href.split('#').next().unwrap_or_default();
        match href.splitn(2, '?').nth(1) {
            Some(query_str) => Self::from_query_str(query_str),
            None => Ok(Query::default()),
        }
    }

    pub fn from_query_str(query_str: &str) -> Result<Query> {
        let mut query = Query::default();

        for segment in query_str.split('&').filter(|s| !s.is_empty()) {
            let mut kv_pair = segment.splitn(2, '=');
            let key = decode(kv_pair.next().unwrap_or_default())?;
            let value = decode(kv_pair.next().unwrap_or_default())?;
            if key.is_empty() {
                continue;
            }

            if key == "include" {
                query.include(&value.split(',').collect::<Vec<_>>());
                continue;
            }

            if key == "sort" {
                query.sort(&value);
                continue;
            }

            if let Some(cap) = (&KEY_REGEX as &Regex).captures(&key) {
                if let (Some(name), Some(param)) = (cap.name("name"), cap.name("param")) {
                    let param = param.as_str();
                    match (name.as_str(), param) {
                        ("fields", _) => {
                            query.fields(param, &value.split(',').collect::<Vec<_>>());
                            continue;
                        },
                        ("filter", _) => {
                            query.filter(param, &value);
                            continue;
                        },
                        ("page", "limit") | ("page", "offset") => {
                            if let Ok(n) = value.parse::<usize>() {
                                if param == "limit" {
                                    query.limit(n);
                                } else {
                                    query.offset(n);
                                }
                                continue;
                            }
                        },
                        _ => {},
                    }
                }
            }

            query.param(&key, &value);
        }

        Ok(query)
    }
}

/// Percent-encodes and joins `(key, value)` pairs in the given order.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn decode(raw: &str) -> Result<String> {
    Ok(percent_decode_str(&raw.replace('+', " ")).decode_utf8()?.into_owned())
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_query_string()) }
}

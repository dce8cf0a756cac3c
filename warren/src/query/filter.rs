use itertools::Itertools;
use std::collections::BTreeMap;

/// Trims every entry, drops empties and duplicates, keeps first-seen order.
pub fn unique_trimmed<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .unique()
        .map(ToString::to_string)
        .collect()
}

/// `filter[<name>]=<value>` parameters, keyed by bare filter name.
///
/// Values are opaque to the client: a comma-separated list filter is sent
/// as one string and its syntax is defined by the server. A filter whose
/// value is empty after trimming is omitted, never sent as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery(BTreeMap<String, String>);

impl FilterQuery {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, name: &str) -> Option<&str> { self.0.get(name).map(String::as_str) }

    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return false;
        }
        self.0.insert(name.to_string(), value.to_string());
        true
    }

    pub fn insert_list<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> bool {
        self.insert(name, &unique_trimmed(values).join(","))
    }

    /// `Type|ID`, the server's syntax for filtering on a polymorphic
    /// relationship; both halves are required.
    pub fn insert_polymorphic(&mut self, name: &str, ty: &str, id: &str) -> bool {
        let (ty, id) = (ty.trim(), id.trim());
        if ty.is_empty() || id.is_empty() {
            return false;
        }
        self.insert(name, &format!("{}|{}", ty, id))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.0.iter().map(|(k, v)| (format!("filter[{}]", k), v.clone()))
    }
}

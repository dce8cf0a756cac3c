/// Sort parameter, passed to the server verbatim. An empty (or blank)
/// value means "server default order"; the client never invents a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortQuery(pub(crate) String);

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub enum OrderType {
    Asc,
    Desc,
}

impl SortQuery {
    pub fn new(raw: &str) -> Self { SortQuery(raw.to_string()) }

    pub fn is_empty(&self) -> bool { self.0.trim().is_empty() }

    pub fn as_str(&self) -> &str { &self.0 }

    /// The sort keys in order, with a leading `-` read as descending.
    pub fn fields(&self) -> Vec<(String, OrderType)> {
        self.0
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "-")
            .map(|v| {
                if let Some(field) = v.strip_prefix('-') {
                    (field.into(), OrderType::Desc)
                } else {
                    (v.into(), OrderType::Asc)
                }
            })
            .collect()
    }
}

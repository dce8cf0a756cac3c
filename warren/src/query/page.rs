/// Offset-based pagination. Zero means "not set": a zero limit asks for the
/// server's default page size, a zero offset is the first page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, Eq, PartialEq)]
pub struct PageQuery {
    pub offset: usize,
    pub limit: usize,
}

impl PageQuery {
    pub fn new(limit: usize, offset: usize) -> Self { Self { offset, limit } }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        if self.limit > 0 {
            pairs.push(("page[limit]".to_string(), self.limit.to_string()));
        }
        if self.offset > 0 {
            pairs.push(("page[offset]".to_string(), self.offset.to_string()));
        }
        pairs
    }

    /// The page after this one, for servers that send no `next` link. A
    /// short page is the last one; without an explicit limit the page size
    /// is unknown and so is the next offset.
    pub fn next(&self, returned: usize) -> Option<PageQuery> {
        if self.limit == 0 || returned < self.limit {
            None
        } else {
            Some(PageQuery { offset: self.offset + returned, limit: self.limit })
        }
    }
}

use crate::model::document::Document;
use crate::model::payload::ResourcePayload;
use crate::query::{encode_pairs, Query};
use crate::{Result, WarrenError};
use http::{Method, StatusCode};

/// One outbound call, as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the transport's base URL, or an absolute URL when a
    /// server-provided link is followed.
    pub path: String,
    /// Already in serialization order; a transport must not reorder them.
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl ToString) -> Self {
        Self { method, path: path.to_string(), query: Vec::new(), body: None }
    }

    pub fn with_query(mut self, query: &Query) -> Self {
        self.query = query.pairs();
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// `path?query`, or the bare path when there is no query.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, encode_pairs(&self.query))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// A failed call: no response at all (`status` is `None`) or a non-2xx one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub status: Option<StatusCode>,
    pub message: String,
    pub body: Vec<u8>,
}

impl From<TransportFailure> for WarrenError {
    fn from(failure: TransportFailure) -> Self {
        WarrenError::Transport {
            status: failure.status,
            message: failure.message,
            body: String::from_utf8_lossy(&failure.body).into_owned(),
        }
    }
}

/// The HTTP seam. Implementations own connection handling, authentication
/// and timeouts; every call here is a single round trip.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportFailure> {
        (**self).execute(request)
    }
}

/// Drives one request/decode cycle per call.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
}

fn member_path(path: &str, id: &str) -> String { format!("{}/{}", path.trim_end_matches('/'), id) }

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.path_and_query());
        let response = self.transport.execute(&request)?;
        debug!("{} {}: {}, {} bytes", request.method, request.path, response.status, response.body.len());
        Ok(response)
    }

    /// Mapping to `GET /<path>?<query>`; `data` must be an array.
    pub fn fetch_collection(&self, path: &str, query: &Query) -> Result<Document> {
        let response = self.send(ApiRequest::new(Method::GET, path).with_query(query))?;
        Document::from_slice(&response.body)?.expect_collection()
    }

    /// Mapping to `GET /<path>/<id>?<query>`; `data` must be an object.
    pub fn fetch_single(&self, path: &str, id: &str, query: &Query) -> Result<Document> {
        let request = ApiRequest::new(Method::GET, member_path(path, id)).with_query(query);
        let response = self.send(request)?;
        Document::from_slice(&response.body)?.expect_single()
    }

    /// Follows a collection's `links.next`. `None` on the last page.
    pub fn fetch_next(&self, document: &Document) -> Result<Option<Document>> {
        let href = match document.pagination().next.as_ref().and_then(|link| link.href()) {
            Some(href) => href.to_string(),
            None => return Ok(None),
        };
        let query = Query::from_link(&href)?;
        let path = href.split(|c| c == '?' || c == '#').next().unwrap_or_default();
        let response = self.send(ApiRequest::new(Method::GET, path).with_query(&query))?;
        Document::from_slice(&response.body)?.expect_collection().map(Some)
    }

    /// Mapping to `POST /<path>`
    pub fn create(&self, path: &str, payload: &ResourcePayload) -> Result<Document> {
        let request = ApiRequest::new(Method::POST, path).with_body(payload.to_vec()?);
        let response = self.send(request)?;
        Document::from_slice(&response.body)?.expect_single()
    }

    /// Mapping to `PATCH /<path>/<id>`
    pub fn update(&self, path: &str, id: &str, payload: &ResourcePayload) -> Result<Document> {
        let request =
            ApiRequest::new(Method::PATCH, member_path(path, id)).with_body(payload.to_vec()?);
        let response = self.send(request)?;
        Document::from_slice(&response.body)?.expect_single()
    }

    /// Mapping to `DELETE /<path>/<id>`. A `204 No Content` and a meta-only
    /// document are both success.
    pub fn delete(&self, path: &str, id: &str) -> Result<()> {
        let response = self.send(ApiRequest::new(Method::DELETE, member_path(path, id)))?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let document = Document::from_slice(&response.body)?;
        match document.errors() {
            Some(errors) => Err(WarrenError::ErrorDocument(errors.clone())),
            None => Ok(()),
        }
    }
}

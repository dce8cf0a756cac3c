#![allow(dead_code)]

use http::StatusCode;
use std::cell::RefCell;
use std::collections::VecDeque;
use warren::operation::{ApiRequest, ApiResponse, Transport, TransportFailure};

pub const SINGLE_WIDGET: &str =
    r#"{"data":{"type":"widgets","id":"1","attributes":{"name":"Foo"}},"included":[]}"#;

pub const OWNED_WIDGETS: &str = r#"{"data":[{"type":"widgets","id":"1","relationships":{"owner":{"data":{"type":"users","id":"9"}}}}],"included":[{"type":"users","id":"9","attributes":{"name":"Ann"}}]}"#;

pub const UNOWNED_WIDGETS: &str = r#"{"data":[{"type":"widgets","id":"1","relationships":{"owner":{"data":{"type":"users","id":"9"}}}}],"included":[]}"#;

pub const PROJECTS_PAGE: &str = r#"{
    "data": [
        {
            "type": "projects", "id": "12",
            "attributes": { "name": "North Yard", "status": "active", "budget": 1200.5, "tags": ["a", "b"] },
            "relationships": {
                "customer": { "data": { "type": "customers", "id": "3" } },
                "broker": { "data": null },
                "material-types": { "data": [] },
                "subject": { "data": { "type": "brokers", "id": "7" } }
            }
        },
        {
            "type": "projects", "id": "13",
            "attributes": { "name": "South Yard", "status": null, "budget": "n/a" },
            "relationships": {
                "customer": { "data": { "type": "customers", "id": "4" } },
                "material-types": { "data": [ { "type": "material-types", "id": "1" } ] }
            }
        }
    ],
    "included": [
        { "type": "customers", "id": "3", "attributes": { "company-name": "Dirt Co", "name": "Bo" } },
        { "type": "customers", "id": "3", "attributes": { "company-name": "Shadow Dirt Co" } },
        { "type": "brokers", "id": "7", "attributes": { "company-name": "Haulers" } }
    ],
    "links": {
        "self": "https://api.example.com/projects?page[limit]=2",
        "next": { "href": "https://api.example.com/projects?page[limit]=2&page[offset]=2", "meta": {} }
    },
    "meta": { "record-count": 5 }
}"#;

pub const LAST_PROJECTS_PAGE: &str =
    r#"{"data":[{"type":"projects","id":"14","attributes":{"name":"East Yard"}}],"links":{"next":null}}"#;

pub const UNPROCESSABLE: &str = r#"{"errors":[{"status":"422","title":"Invalid","detail":"name is blank","source":{"pointer":"/data/attributes/name"}}]}"#;

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: RefCell<Vec<ApiRequest>>,
    responses: RefCell<VecDeque<Result<ApiResponse, TransportFailure>>>,
}

impl RecordingTransport {
    pub fn new() -> Self { Default::default() }

    pub fn respond(self, status: StatusCode, body: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(ApiResponse { status, body: body.as_bytes().to_vec() }));
        self
    }

    pub fn fail(self, status: StatusCode, body: &str) -> Self {
        self.responses.borrow_mut().push_back(Err(TransportFailure {
            status: Some(status),
            message: status.to_string(),
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn request(&self, i: usize) -> ApiRequest { self.requests.borrow()[i].clone() }

    pub fn request_count(&self) -> usize { self.requests.borrow().len() }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportFailure> {
        self.requests.borrow_mut().push(request.clone());
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(TransportFailure { status: None, message: "no canned response left".into(), body: vec![] })
        })
    }
}

pub mod common;

use common::*;
use http::{Method, StatusCode};
use warren::model::payload::ResourcePayload;
use warren::operation::Client;
use warren::query::Query;
use warren::WarrenError;

#[test]
fn list_issues_one_get_with_the_serialized_query() {
    let _ = env_logger::try_init();

    let transport = RecordingTransport::new().respond(StatusCode::OK, PROJECTS_PAGE);
    let client = Client::new(&transport);
    let mut query = Query::new();
    query.filter("status", "active").include(&["customer", "subject"]).limit(2);

    let doc = client.fetch_collection("projects", &query).unwrap();
    assert_eq!(doc.resources().len(), 2);
    assert_eq!(transport.request_count(), 1);

    let request = transport.request(0);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path_and_query(), "projects?filter[status]=active&include=customer,subject&page[limit]=2");
    assert!(request.body.is_none());
}

#[test]
fn next_pages_follow_the_server_link() {
    let _ = env_logger::try_init();

    let transport = RecordingTransport::new()
        .respond(StatusCode::OK, PROJECTS_PAGE)
        .respond(StatusCode::OK, LAST_PROJECTS_PAGE);
    let client = Client::new(&transport);

    let first = client.fetch_collection("projects", &Query::new()).unwrap();
    let second = client.fetch_next(&first).unwrap().unwrap();
    assert_eq!(second.resources()[0].id, "14");
    assert_eq!(
        transport.request(1).path_and_query(),
        "https://api.example.com/projects?page[limit]=2&page[offset]=2"
    );
    assert!(client.fetch_next(&second).unwrap().is_none());
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn show_rejects_a_collection() {
    let transport = RecordingTransport::new().respond(StatusCode::OK, PROJECTS_PAGE);
    let client = Client::new(&transport);
    match client.fetch_single("projects", "12", &Query::new()) {
        Err(WarrenError::UnexpectedData { expected, .. }) => assert_eq!(expected, "a single resource"),
        other => unreachable!("get: {:?}", other),
    }
    assert_eq!(transport.request(0).path, "projects/12");
}

#[test]
fn create_and_update_send_the_payload() {
    let transport = RecordingTransport::new()
        .respond(StatusCode::CREATED, SINGLE_WIDGET)
        .respond(StatusCode::OK, SINGLE_WIDGET);
    let client = Client::new(&transport);

    let mut payload = ResourcePayload::new("widgets");
    payload.attribute_if_present("name", "Foo");
    let created = client.create("widgets", &payload).unwrap();
    assert_eq!(created.resources()[0].id, "1");

    let mut payload = ResourcePayload::update("widgets", "1");
    payload.attribute("name", "Bar");
    client.update("widgets", "1", &payload).unwrap();

    let create = transport.request(0);
    assert_eq!((create.method, create.path.as_str()), (Method::POST, "widgets"));
    assert_eq!(create.body.as_deref(), Some(&br#"{"data":{"type":"widgets","attributes":{"name":"Foo"}}}"#[..]));
    let update = transport.request(1);
    assert_eq!((update.method, update.path.as_str()), (Method::PATCH, "widgets/1"));
}

#[test]
fn failures_attach_the_body() {
    let transport = RecordingTransport::new().fail(StatusCode::UNPROCESSABLE_ENTITY, UNPROCESSABLE);
    let client = Client::new(&transport);
    let err = client.create("widgets", &ResourcePayload::new("widgets")).unwrap_err();
    match &err {
        WarrenError::Transport { status, body, .. } => {
            assert_eq!(*status, Some(StatusCode::UNPROCESSABLE_ENTITY));
            assert_eq!(body, UNPROCESSABLE);
        },
        other => unreachable!("get: {:?}", other),
    }
    assert_eq!(err.summary().as_deref(), Some("[422] Invalid: name is blank (/data/attributes/name)"));
}

#[test]
fn plain_text_bodies_are_kept_verbatim() {
    let transport =
        RecordingTransport::new().fail(StatusCode::BAD_GATEWAY, "  line one\n  line two\n");
    let client = Client::new(&transport);
    let err = client.fetch_collection("projects", &Query::new()).unwrap_err();
    assert_eq!(err.body(), Some("  line one\n  line two\n"));
    assert_eq!(err.summary().as_deref(), Some("  line one\n  line two\n"));
}

#[test]
fn delete_accepts_no_content() {
    let transport = RecordingTransport::new()
        .respond(StatusCode::NO_CONTENT, "")
        .respond(StatusCode::OK, r#"{"meta":{"deleted":true}}"#)
        .respond(StatusCode::OK, UNPROCESSABLE);
    let client = Client::new(&transport);
    client.delete("widgets", "1").unwrap();
    client.delete("widgets", "2").unwrap();
    assert!(matches!(client.delete("widgets", "3"), Err(WarrenError::ErrorDocument(_))));
    assert_eq!(transport.request(2).method, Method::DELETE);
}

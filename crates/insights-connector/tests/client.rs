//! End-to-end client tests over a recording stub transport.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Read;
use std::rc::Rc;

use chrono::{FixedOffset, NaiveDate};
use insights_connector::transport::{Body, Method, Request, Response, Transport};
use insights_connector::{
    AttributeAssignment, AttributeType, Client, Config, ConnectorLog, Credentials, DomainGraph,
    Entity, Error, Level, Relationship, Timestamp, TransportError, Value, ValueKind, WireFormat,
};
use serde_json::json;

struct RecordedRequest {
    method: Method,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

#[derive(Clone)]
struct StubTransport {
    requests: Rc<RefCell<Vec<RecordedRequest>>>,
    responses: Rc<RefCell<VecDeque<Response>>>,
}

impl StubTransport {
    fn new(responses: Vec<Response>) -> Self {
        Self {
            requests: Rc::new(RefCell::new(Vec::new())),
            responses: Rc::new(RefCell::new(responses.into())),
        }
    }

    fn recorded(&self) -> std::cell::Ref<'_, Vec<RecordedRequest>> {
        self.requests.borrow()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let body = match request.body {
            Body::Empty => Vec::new(),
            Body::Fixed(bytes) => bytes,
            Body::Stream(chunks) => {
                let mut out = Vec::new();
                for chunk in chunks {
                    out.extend(chunk.map_err(|e| TransportError::new(e.to_string()))?);
                }
                out
            }
        };
        self.requests.borrow_mut().push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TransportError::new("no response queued"))
    }
}

fn ok_response() -> Response {
    Response {
        status: 200,
        body: Vec::new(),
    }
}

fn json_response(status: u16, value: serde_json::Value) -> Response {
    Response {
        status,
        body: serde_json::to_vec(&value).unwrap(),
    }
}

fn client_with(
    credentials: Credentials,
    wire_format: WireFormat,
    responses: Vec<Response>,
) -> (Client, StubTransport) {
    let transport = StubTransport::new(responses);
    let mut config = Config::new("https://local.elimity.com/", credentials);
    config.wire_format = wire_format;
    let client = Client::with_transport(config, Box::new(transport.clone()));
    (client, transport)
}

fn token_client(wire_format: WireFormat, responses: Vec<Response>) -> (Client, StubTransport) {
    client_with(
        Credentials::Token("t0ken".to_string()),
        wire_format,
        responses,
    )
}

fn inflate(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = flate2::read::ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

fn header<'a>(request: &'a RecordedRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.as_str())
}

fn sample_graph() -> DomainGraph {
    let date_time = NaiveDate::from_ymd_opt(2001, 2, 3)
        .unwrap()
        .and_hms_opt(4, 5, 6)
        .unwrap();
    DomainGraph {
        entities: vec![Entity {
            id: "foo".to_string(),
            name: "bar".to_string(),
            entity_type: "baz".to_string(),
            active: true,
            attribute_assignments: vec![AttributeAssignment::new("foo", Value::Number(99.0))],
        }],
        relationships: vec![Relationship {
            from_entity_id: "foo".to_string(),
            from_entity_type: "baz".to_string(),
            to_entity_id: "bar".to_string(),
            to_entity_type: "foo".to_string(),
            attribute_assignments: vec![],
        }],
        timestamp: Some(Timestamp::with_offset(
            date_time,
            FixedOffset::east_opt(0).unwrap(),
        )),
    }
}

#[test]
fn test_reload_domain_graph_v1_wire() {
    let (client, transport) = token_client(WireFormat::V1, vec![ok_response()]);
    client.reload_domain_graph(&sample_graph()).unwrap();

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.url,
        "https://local.elimity.com/api/custom-connector-domain-graphs"
    );
    assert_eq!(header(request, "Authorization"), Some("Bearer t0ken"));
    assert_eq!(header(request, "Content-Encoding"), Some("deflate"));
    assert_eq!(header(request, "Content-Type"), Some("application/json"));

    let expected = json!({
        "entities": [{
            "active": true,
            "attributeAssignments": [{
                "attributeTypeName": "foo",
                "value": {"type": "number", "value": "99"},
            }],
            "id": "foo",
            "name": "bar",
            "type": "baz",
        }],
        "historyTimestamp": "2001-02-03T04:05:06+00:00",
        "relationships": [{
            "attributeAssignments": [],
            "fromId": "foo",
            "fromType": "baz",
            "toId": "bar",
            "toType": "foo",
        }],
    });
    let expected_text = serde_json::to_string(&expected).unwrap();
    assert_eq!(inflate(&request.body), expected_text.as_bytes());
}

#[test]
fn test_reload_domain_graph_v2_wire() {
    let (client, transport) = token_client(WireFormat::V2, vec![ok_response()]);
    client.reload_domain_graph(&sample_graph()).unwrap();

    let requests = transport.recorded();
    let request = &requests[0];
    assert_eq!(
        header(request, "Content-Type"),
        Some("application/prs.deflate-json")
    );

    let decoded: serde_json::Value = serde_json::from_slice(&inflate(&request.body)).unwrap();
    assert_eq!(
        decoded["historyTimestamp"],
        json!({"year": 2001, "month": 2, "day": 3, "hour": 4, "minute": 5, "second": 6})
    );
    let entity = &decoded["entities"][0];
    assert!(entity.get("active").is_none());
    assert_eq!(
        entity["attributeAssignments"][0]["value"],
        json!({"type": "number", "value": 99})
    );
    assert_eq!(decoded["relationships"][0]["fromEntityId"], json!("foo"));
}

#[test]
fn test_error_status_makes_single_attempt() {
    let (client, transport) = token_client(
        WireFormat::V1,
        vec![Response {
            status: 400,
            body: b"bad graph".to_vec(),
        }],
    );
    let error = client.reload_domain_graph(&sample_graph()).unwrap_err();
    match error {
        Error::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad graph");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.recorded().len(), 1);
}

#[test]
fn test_password_credentials_fetch_token_once() {
    let (client, transport) = client_with(
        Credentials::Password {
            user: "connector".to_string(),
            password: "s3cret".to_string(),
        },
        WireFormat::V1,
        vec![
            json_response(200, json!({"token": "issued-token"})),
            ok_response(),
            ok_response(),
        ],
    );
    client.send_connector_logs(&[]).unwrap();
    client.send_connector_logs(&[]).unwrap();

    let requests = transport.recorded();
    assert_eq!(requests.len(), 3);

    let auth = &requests[0];
    assert_eq!(auth.method, Method::Post);
    assert_eq!(
        auth.url,
        "https://local.elimity.com/api/authenticate/connector"
    );
    let auth_body: serde_json::Value = serde_json::from_slice(&auth.body).unwrap();
    assert_eq!(auth_body, json!({"type": "password", "value": "s3cret"}));

    for request in &requests[1..] {
        assert_eq!(header(request, "Authorization"), Some("Bearer issued-token"));
        assert_eq!(
            request.url,
            "https://local.elimity.com/api/custom-connector-logs"
        );
    }
}

#[test]
fn test_send_connector_logs_wire() {
    let (client, transport) = token_client(WireFormat::V1, vec![ok_response()]);
    let timestamp = Timestamp::with_offset(
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        FixedOffset::east_opt(0).unwrap(),
    );
    client
        .send_connector_logs(&[ConnectorLog {
            level: Level::Info,
            message: "synchronization started".to_string(),
            timestamp,
        }])
        .unwrap();

    let requests = transport.recorded();
    let decoded: serde_json::Value = serde_json::from_slice(&inflate(&requests[0].body)).unwrap();
    assert_eq!(
        decoded,
        json!([{
            "level": "info",
            "message": "synchronization started",
            "timestamp": "2020-01-01T00:00:00+00:00",
        }])
    );
}

#[test]
fn test_get_domain_graph_schema() {
    let fixture = json!({
        "entityAttributeTypes": [{
            "archived": false,
            "category": "file",
            "description": "writability",
            "name": "writable",
            "type": "boolean",
        }],
        "entityTypes": [{
            "icon": "user-icon",
            "key": "user",
            "plural": "users",
            "singular": "user",
        }],
        "relationshipAttributeTypes": [{
            "archived": true,
            "childType": "file",
            "description": "ownership share",
            "name": "share",
            "parentType": "user",
            "type": "number",
        }],
    });
    let (client, transport) = token_client(WireFormat::V1, vec![json_response(200, fixture)]);
    let schema = client.get_domain_graph_schema().unwrap();

    let requests = transport.recorded();
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(
        requests[0].url,
        "https://local.elimity.com/api/domain-graph-schema"
    );
    assert_eq!(
        header(&requests[0], "Authorization"),
        Some("Bearer t0ken")
    );

    assert_eq!(schema.entity_attribute_types.len(), 1);
    assert_eq!(schema.entity_attribute_types[0].kind, ValueKind::Boolean);
    assert_eq!(schema.entity_types[0].key, "user");
    assert!(schema.relationship_attribute_types[0].archived);
    assert_eq!(
        schema.relationship_attribute_types[0].kind,
        ValueKind::Number
    );
}

#[test]
fn test_create_attribute_type_v1_wire() {
    let (client, transport) = token_client(WireFormat::V1, vec![ok_response()]);
    client
        .create_attribute_type(&AttributeType {
            archived: false,
            description: "last seen".to_string(),
            entity_type: "user".to_string(),
            name: "lastSeen".to_string(),
            kind: ValueKind::DateTime,
        })
        .unwrap();

    let requests = transport.recorded();
    assert_eq!(
        requests[0].url,
        "https://local.elimity.com/api/attributeTypes"
    );
    let decoded: serde_json::Value = serde_json::from_slice(&inflate(&requests[0].body)).unwrap();
    assert_eq!(
        decoded,
        json!({
            "category": "user",
            "description": "last seen",
            "name": "lastSeen",
            "type": "dateTime",
        })
    );
}

#[test]
fn test_declarations_unavailable_on_v2() {
    let (client, transport) = token_client(WireFormat::V2, vec![]);
    let error = client
        .create_attribute_type(&AttributeType {
            archived: false,
            description: String::new(),
            entity_type: "user".to_string(),
            name: "lastSeen".to_string(),
            kind: ValueKind::DateTime,
        })
        .unwrap_err();
    assert!(matches!(error, Error::NotImplemented { .. }));
    assert!(transport.recorded().is_empty());
}

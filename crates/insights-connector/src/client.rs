//! Blocking client for the connector API.

use once_cell::unsync::OnceCell;
use serde_json::{json, Value as Json};
use tracing::debug;

use crate::codec::{
    decode_domain_graph_schema, deflate_stream, encode_attribute_type, encode_connector_logs,
    encode_domain_graph, encode_relationship_attribute_type, WireFormat,
};
use crate::error::{DecodeError, Error, TransportError};
use crate::model::{
    AttributeType, ConnectorLog, DomainGraph, DomainGraphSchema, RelationshipAttributeType,
};
use crate::transport::{Body, HttpTransport, Method, Request, Response, Transport};

/// How the client authenticates against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A source token, sent as-is.
    Token(String),
    /// A user name and password, exchanged for a token on first use.
    Password { user: String, password: String },
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the server, e.g. `https://example.elimity.com`.
    pub url: String,
    pub credentials: Credentials,
    /// Whether to validate the server certificate. Disable only for
    /// on-premises deployments with self-signed certificates.
    pub verify_ssl: bool,
    pub wire_format: WireFormat,
}

impl Config {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            verify_ssl: true,
            wire_format: WireFormat::default(),
        }
    }
}

/// Blocking connector client.
///
/// Operations send a single request each and perform no retries; a failed
/// call leaves no client-side state behind except a cached token, which is
/// fetched at most once for the lifetime of the client.
pub struct Client {
    config: Config,
    transport: Box<dyn Transport>,
    token: OnceCell<String>,
}

impl Client {
    /// Creates a client backed by a real HTTP transport.
    pub fn new(config: Config) -> Result<Self, Error> {
        let transport = HttpTransport::new(config.verify_ssl)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(config: Config, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            token: OnceCell::new(),
        }
    }

    /// Uploads a domain graph snapshot.
    pub fn reload_domain_graph(&self, graph: &DomainGraph) -> Result<(), Error> {
        let value = encode_domain_graph(graph, self.config.wire_format)?;
        self.post("api/custom-connector-domain-graphs", value)?;
        Ok(())
    }

    /// Sends a batch of connector log lines.
    pub fn send_connector_logs(&self, logs: &[ConnectorLog]) -> Result<(), Error> {
        let value = encode_connector_logs(logs, self.config.wire_format)?;
        self.post("api/custom-connector-logs", value)?;
        Ok(())
    }

    /// Declares an entity attribute type.
    pub fn create_attribute_type(&self, attribute_type: &AttributeType) -> Result<(), Error> {
        self.require_declarations("api/attributeTypes")?;
        let value = encode_attribute_type(attribute_type);
        self.post("api/attributeTypes", value)?;
        Ok(())
    }

    /// Declares a relationship attribute type.
    pub fn create_relationship_attribute_type(
        &self,
        attribute_type: &RelationshipAttributeType,
    ) -> Result<(), Error> {
        self.require_declarations("api/relationshipAttributeTypes")?;
        let value = encode_relationship_attribute_type(attribute_type);
        self.post("api/relationshipAttributeTypes", value)?;
        Ok(())
    }

    /// Fetches the domain graph schema currently known to the server.
    pub fn get_domain_graph_schema(&self) -> Result<DomainGraphSchema, Error> {
        let request = Request {
            method: Method::Get,
            url: self.url("api/domain-graph-schema"),
            headers: vec![("Authorization", self.bearer()?)],
            body: Body::Empty,
        };
        let response = self.send(request)?;
        Ok(decode_domain_graph_schema(&response.body)?)
    }

    /// Declaration endpoints only exist on servers speaking the older
    /// convention; newer servers derive the schema from uploaded graphs.
    fn require_declarations(&self, endpoint: &'static str) -> Result<(), Error> {
        match self.config.wire_format {
            WireFormat::V1 => Ok(()),
            WireFormat::V2 => Err(Error::NotImplemented {
                endpoint,
                format: self.config.wire_format,
            }),
        }
    }

    fn post(&self, path: &str, value: Json) -> Result<Response, Error> {
        let content_type = match self.config.wire_format {
            WireFormat::V1 => "application/json",
            WireFormat::V2 => "application/prs.deflate-json",
        };
        let request = Request {
            method: Method::Post,
            url: self.url(path),
            headers: vec![
                ("Authorization", self.bearer()?),
                ("Content-Encoding", "deflate".to_string()),
                ("Content-Type", content_type.to_string()),
            ],
            body: Body::Stream(Box::new(deflate_stream(value))),
        };
        self.send(request)
    }

    fn send(&self, request: Request) -> Result<Response, Error> {
        debug!(url = %request.url, method = ?request.method, "dispatching request");
        let response = self.transport.send(request)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            })
        }
    }

    fn bearer(&self) -> Result<String, Error> {
        Ok(format!("Bearer {}", self.token()?))
    }

    /// Returns the source token, exchanging the password for one on first
    /// use. The token is cached for the lifetime of the client and never
    /// refreshed.
    fn token(&self) -> Result<&str, Error> {
        let token = self.token.get_or_try_init(|| self.fetch_token())?;
        Ok(token)
    }

    fn fetch_token(&self) -> Result<String, Error> {
        match &self.config.credentials {
            Credentials::Token(token) => Ok(token.clone()),
            Credentials::Password { user, password } => {
                let body = json!({"type": "password", "value": password});
                let encoded = body.to_string().into_bytes();
                let request = Request {
                    method: Method::Post,
                    url: self.url(&format!("api/authenticate/{user}")),
                    headers: vec![("Content-Type", "application/json".to_string())],
                    body: Body::Fixed(encoded),
                };
                let response = self.send(request)?;
                let value: Json =
                    serde_json::from_slice(&response.body).map_err(DecodeError::Json)?;
                match value.get("token").and_then(Json::as_str) {
                    Some(token) => Ok(token.to_string()),
                    None => Err(Error::Transport(TransportError::new(
                        "authentication response carried no token".to_string(),
                    ))),
                }
            }
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.config.url.trim_end_matches('/');
        format!("{base}/{path}")
    }
}

//! Blocking client for pushing domain graphs, attribute type declarations,
//! and connector logs to an Elimity Insights server, and for fetching the
//! domain graph schema it currently knows.
//!
//! Upload bodies are serialized incrementally: model objects are encoded to
//! wire JSON, the JSON text is produced fragment by fragment, compressed
//! with zlib-format deflate, and transmitted in fixed-size chunks. Large
//! graphs never need to be resident as a single buffer.
//!
//! Naive timestamps (without a UTC offset) are interpreted in the local
//! system timezone at encode time. Run connectors with a deliberate `TZ` if
//! the host timezone is not the one the data was recorded in.
//!
//! # Quick start
//!
//! ```no_run
//! use insights_connector::{Client, Config, Credentials, DomainGraph, Entity};
//!
//! fn main() -> Result<(), insights_connector::Error> {
//!     let config = Config::new(
//!         "https://example.elimity.com",
//!         Credentials::Token("source-token".to_string()),
//!     );
//!     let client = Client::new(config)?;
//!
//!     let graph = DomainGraph {
//!         entities: vec![Entity {
//!             id: "alice".to_string(),
//!             name: "Alice".to_string(),
//!             entity_type: "user".to_string(),
//!             active: true,
//!             attribute_assignments: vec![],
//!         }],
//!         relationships: vec![],
//!         timestamp: None,
//!     };
//!     client.reload_domain_graph(&graph)?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{Client, Config, Credentials};
pub use codec::WireFormat;
pub use error::{DecodeError, EncodeError, Error, TransportError};
pub use model::{
    AttributeAssignment, AttributeType, ConnectorLog, DomainGraph, DomainGraphSchema, Entity,
    EntityType, Level, Relationship, RelationshipAttributeType, TimeOfDay, Timestamp, Value,
    ValueKind,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Wire encoding for the connector API.
//!
//! Encoders map model objects to nested wire objects; the [`stream`] module
//! turns those into deflate-compressed byte chunks for transmission.

pub mod graph;
pub mod log;
pub mod schema;
pub mod stream;
pub mod value;

pub use graph::encode_domain_graph;
pub use log::encode_connector_logs;
pub use schema::{
    decode_domain_graph_schema, encode_attribute_type, encode_relationship_attribute_type,
};
pub use stream::{DeflateChunks, JsonFragments, Rechunk, deflate_stream};
pub use value::encode_value;

/// Wire convention of a server generation.
///
/// The two conventions are not interchangeable: a server expects exactly one
/// of them. Encoders take the format as configuration so the tag vocabulary
/// and field naming are never hardcoded per call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// String-rendered scalars: booleans as `"true"`/`"false"`, numbers as
    /// shortest round-tripping decimal strings, dates and times as flat
    /// strings. Entities carry an `active` flag and relationships use
    /// `fromId`/`toId`/`fromType`/`toType`.
    #[default]
    V1,

    /// Structured convention of the newest server generation: native JSON
    /// scalars, calendar-field objects for dates and times, no `active`
    /// flag, and `fromEntityId`/`fromEntityType`/`toEntityId`/`toEntityType`
    /// naming. Attribute declarations are managed server-side.
    V2,
}

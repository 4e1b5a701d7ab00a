//! Data model types for connector submissions.
//!
//! This module contains all the core types for representing connector data:
//! - Values (typed attribute instances)
//! - Graphs (entities, relationships, domain-graph snapshots)
//! - Schema declarations (attribute types, entity types)
//! - Connector logs

pub mod graph;
pub mod log;
pub mod schema;
pub mod value;

pub use graph::{DomainGraph, Entity, Relationship};
pub use log::{ConnectorLog, Level};
pub use schema::{AttributeType, DomainGraphSchema, EntityType, RelationshipAttributeType};
pub use value::{AttributeAssignment, TimeOfDay, Timestamp, Value, ValueKind};

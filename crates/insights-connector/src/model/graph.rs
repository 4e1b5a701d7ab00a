//! Entities, relationships, and domain-graph snapshots.

use crate::model::{AttributeAssignment, Timestamp};

/// A typed entity with attribute assignments.
///
/// Ids are caller-supplied and must be unique within the enclosing
/// [`DomainGraph`]'s entity collection; the library does not enforce this.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub active: bool,
    pub attribute_assignments: Vec<AttributeAssignment>,
}

/// A directed, typed edge between two entities.
///
/// Both endpoints are referenced by (id, type) pairs rather than by object
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub from_entity_id: String,
    pub from_entity_type: String,
    pub to_entity_id: String,
    pub to_entity_type: String,
    pub attribute_assignments: Vec<AttributeAssignment>,
}

/// One full-graph snapshot, submitted atomically to the server.
///
/// Constructed by the caller immediately before submission; the library
/// retains nothing after the call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainGraph {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    /// The point in time this snapshot represents, used for historical
    /// tracking server-side.
    pub timestamp: Option<Timestamp>,
}

//! Schema declarations and the fetched domain-graph schema.

use crate::model::ValueKind;

/// Declaration of an entity attribute type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeType {
    pub archived: bool,
    pub description: String,
    pub entity_type: String,
    pub name: String,
    pub kind: ValueKind,
}

/// Declaration of a relationship attribute type, keyed by both endpoint
/// entity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipAttributeType {
    pub archived: bool,
    pub description: String,
    pub from_entity_type: String,
    pub name: String,
    pub to_entity_type: String,
    pub kind: ValueKind,
}

/// An entity type as reported by the server's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    pub icon: String,
    pub key: String,
    pub plural: String,
    pub singular: String,
}

/// The server's domain-graph schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainGraphSchema {
    pub entity_attribute_types: Vec<AttributeType>,
    pub entity_types: Vec<EntityType>,
    pub relationship_attribute_types: Vec<RelationshipAttributeType>,
}

//! Schema declarations: write-path encoders and read-path decoding.
//!
//! Declarations are field renames only; no value formatting is involved, so
//! the encoders are independent of the wire format.

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::error::DecodeError;
use crate::model::{
    AttributeType, DomainGraphSchema, EntityType, RelationshipAttributeType, ValueKind,
};

/// Encodes an attribute-type declaration.
pub fn encode_attribute_type(attribute_type: &AttributeType) -> Json {
    let mut object = Map::new();
    object.insert(
        "category".to_string(),
        Json::String(attribute_type.entity_type.clone()),
    );
    object.insert(
        "description".to_string(),
        Json::String(attribute_type.description.clone()),
    );
    object.insert(
        "name".to_string(),
        Json::String(attribute_type.name.clone()),
    );
    object.insert(
        "type".to_string(),
        Json::String(attribute_type.kind.as_wire().to_string()),
    );
    Json::Object(object)
}

/// Encodes a relationship-attribute-type declaration. The from-endpoint is
/// the wire's `parentType` and the to-endpoint its `childType`.
pub fn encode_relationship_attribute_type(
    attribute_type: &RelationshipAttributeType,
) -> Json {
    let mut object = Map::new();
    object.insert(
        "childType".to_string(),
        Json::String(attribute_type.to_entity_type.clone()),
    );
    object.insert(
        "description".to_string(),
        Json::String(attribute_type.description.clone()),
    );
    object.insert(
        "name".to_string(),
        Json::String(attribute_type.name.clone()),
    );
    object.insert(
        "parentType".to_string(),
        Json::String(attribute_type.from_entity_type.clone()),
    );
    object.insert(
        "type".to_string(),
        Json::String(attribute_type.kind.as_wire().to_string()),
    );
    Json::Object(object)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaDto {
    entity_attribute_types: Vec<AttributeTypeDto>,
    entity_types: Vec<EntityTypeDto>,
    relationship_attribute_types: Vec<RelationshipAttributeTypeDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeTypeDto {
    #[serde(default)]
    archived: bool,
    category: String,
    description: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct EntityTypeDto {
    icon: String,
    key: String,
    plural: String,
    singular: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipAttributeTypeDto {
    #[serde(default)]
    archived: bool,
    child_type: String,
    description: String,
    name: String,
    parent_type: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Decodes a `GET domain-graph-schema` response body.
pub fn decode_domain_graph_schema(body: &[u8]) -> Result<DomainGraphSchema, DecodeError> {
    let dto: SchemaDto = serde_json::from_slice(body)?;

    let entity_attribute_types = dto
        .entity_attribute_types
        .into_iter()
        .map(|attribute_type| {
            Ok(AttributeType {
                archived: attribute_type.archived,
                description: attribute_type.description,
                entity_type: attribute_type.category,
                name: attribute_type.name,
                kind: decode_kind(&attribute_type.kind)?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    let entity_types = dto
        .entity_types
        .into_iter()
        .map(|entity_type| EntityType {
            icon: entity_type.icon,
            key: entity_type.key,
            plural: entity_type.plural,
            singular: entity_type.singular,
        })
        .collect();

    let relationship_attribute_types = dto
        .relationship_attribute_types
        .into_iter()
        .map(|attribute_type| {
            Ok(RelationshipAttributeType {
                archived: attribute_type.archived,
                description: attribute_type.description,
                from_entity_type: attribute_type.parent_type,
                name: attribute_type.name,
                to_entity_type: attribute_type.child_type,
                kind: decode_kind(&attribute_type.kind)?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(DomainGraphSchema {
        entity_attribute_types,
        entity_types,
        relationship_attribute_types,
    })
}

fn decode_kind(tag: &str) -> Result<ValueKind, DecodeError> {
    ValueKind::from_wire(tag).ok_or_else(|| DecodeError::UnknownValueKind {
        found: tag.to_string(),
    })
}

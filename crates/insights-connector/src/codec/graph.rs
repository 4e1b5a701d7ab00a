//! Domain-graph encoding: entities, relationships, and snapshots.

use serde_json::{Map, Value as Json};

use crate::codec::WireFormat;
use crate::codec::value::{encode_timestamp, encode_value};
use crate::error::EncodeError;
use crate::model::{AttributeAssignment, DomainGraph, Entity, Relationship};

/// Encodes a domain graph to its top-level wire object.
///
/// The `historyTimestamp` field is present exactly when the graph carries a
/// snapshot timestamp; an absent timestamp omits the key entirely rather
/// than writing null.
pub fn encode_domain_graph(graph: &DomainGraph, format: WireFormat) -> Result<Json, EncodeError> {
    let entities = graph
        .entities
        .iter()
        .map(|entity| encode_entity(entity, format))
        .collect::<Result<Vec<_>, _>>()?;
    let relationships = graph
        .relationships
        .iter()
        .map(|relationship| encode_relationship(relationship, format))
        .collect::<Result<Vec<_>, _>>()?;

    let mut object = Map::new();
    object.insert("entities".to_string(), Json::Array(entities));
    object.insert("relationships".to_string(), Json::Array(relationships));
    if let Some(timestamp) = &graph.timestamp {
        object.insert(
            "historyTimestamp".to_string(),
            encode_timestamp(timestamp, format)?,
        );
    }
    Ok(Json::Object(object))
}

fn encode_entity(entity: &Entity, format: WireFormat) -> Result<Json, EncodeError> {
    let assignments = encode_assignments(&entity.attribute_assignments, format)?;
    let mut object = Map::new();
    // the structured generation dropped the active flag
    if format == WireFormat::V1 {
        object.insert("active".to_string(), Json::Bool(entity.active));
    }
    object.insert("attributeAssignments".to_string(), assignments);
    object.insert("id".to_string(), Json::String(entity.id.clone()));
    object.insert("name".to_string(), Json::String(entity.name.clone()));
    object.insert(
        "type".to_string(),
        Json::String(entity.entity_type.clone()),
    );
    Ok(Json::Object(object))
}

fn encode_relationship(
    relationship: &Relationship,
    format: WireFormat,
) -> Result<Json, EncodeError> {
    let assignments = encode_assignments(&relationship.attribute_assignments, format)?;
    let (from_id, from_type, to_id, to_type) = match format {
        WireFormat::V1 => ("fromId", "fromType", "toId", "toType"),
        WireFormat::V2 => ("fromEntityId", "fromEntityType", "toEntityId", "toEntityType"),
    };

    let mut object = Map::new();
    object.insert("attributeAssignments".to_string(), assignments);
    object.insert(
        from_id.to_string(),
        Json::String(relationship.from_entity_id.clone()),
    );
    object.insert(
        from_type.to_string(),
        Json::String(relationship.from_entity_type.clone()),
    );
    object.insert(
        to_id.to_string(),
        Json::String(relationship.to_entity_id.clone()),
    );
    object.insert(
        to_type.to_string(),
        Json::String(relationship.to_entity_type.clone()),
    );
    Ok(Json::Object(object))
}

fn encode_assignments(
    assignments: &[AttributeAssignment],
    format: WireFormat,
) -> Result<Json, EncodeError> {
    let encoded = assignments
        .iter()
        .map(|assignment| encode_assignment(assignment, format))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json::Array(encoded))
}

fn encode_assignment(
    assignment: &AttributeAssignment,
    format: WireFormat,
) -> Result<Json, EncodeError> {
    let mut object = Map::new();
    object.insert(
        "attributeTypeName".to_string(),
        Json::String(assignment.attribute_type_name.clone()),
    );
    object.insert("value".to_string(), encode_value(&assignment.value, format)?);
    Ok(Json::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::json;

    fn sample_graph(timestamp: Option<crate::model::Timestamp>) -> DomainGraph {
        DomainGraph {
            entities: vec![Entity {
                id: "foo".to_string(),
                name: "bar".to_string(),
                entity_type: "baz".to_string(),
                active: true,
                attribute_assignments: vec![AttributeAssignment::new(
                    "foo",
                    Value::Boolean(true),
                )],
            }],
            relationships: vec![Relationship {
                from_entity_id: "foo".to_string(),
                from_entity_type: "baz".to_string(),
                to_entity_id: "bar".to_string(),
                to_entity_type: "foo".to_string(),
                attribute_assignments: vec![],
            }],
            timestamp,
        }
    }

    #[test]
    fn test_encode_graph_v1_field_names() {
        let encoded = encode_domain_graph(&sample_graph(None), WireFormat::V1).unwrap();
        assert_eq!(
            encoded,
            json!({
                "entities": [{
                    "active": true,
                    "attributeAssignments": [{
                        "attributeTypeName": "foo",
                        "value": {"type": "boolean", "value": "true"},
                    }],
                    "id": "foo",
                    "name": "bar",
                    "type": "baz",
                }],
                "relationships": [{
                    "attributeAssignments": [],
                    "fromId": "foo",
                    "fromType": "baz",
                    "toId": "bar",
                    "toType": "foo",
                }],
            })
        );
    }

    #[test]
    fn test_encode_graph_v2_field_names() {
        let encoded = encode_domain_graph(&sample_graph(None), WireFormat::V2).unwrap();
        assert_eq!(
            encoded,
            json!({
                "entities": [{
                    "attributeAssignments": [{
                        "attributeTypeName": "foo",
                        "value": {"type": "boolean", "value": true},
                    }],
                    "id": "foo",
                    "name": "bar",
                    "type": "baz",
                }],
                "relationships": [{
                    "attributeAssignments": [],
                    "fromEntityId": "foo",
                    "fromEntityType": "baz",
                    "toEntityId": "bar",
                    "toEntityType": "foo",
                }],
            })
        );
    }

    #[test]
    fn test_history_timestamp_presence() {
        let encoded = encode_domain_graph(&sample_graph(None), WireFormat::V1).unwrap();
        assert!(encoded.get("historyTimestamp").is_none());

        let date_time = NaiveDate::from_ymd_opt(2001, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 6)
            .unwrap();
        let timestamp = crate::model::Timestamp::with_offset(
            date_time,
            FixedOffset::east_opt(0).unwrap(),
        );
        let encoded = encode_domain_graph(&sample_graph(Some(timestamp)), WireFormat::V1).unwrap();
        assert_eq!(
            encoded.get("historyTimestamp"),
            Some(&json!("2001-02-03T04:05:06+00:00"))
        );
    }
}

//! Connector log encoding.

use serde_json::{Map, Value as Json};

use crate::codec::WireFormat;
use crate::codec::value::encode_timestamp;
use crate::error::EncodeError;
use crate::model::{ConnectorLog, Level};

/// Encodes a batch of connector logs to a wire array.
pub fn encode_connector_logs(
    logs: &[ConnectorLog],
    format: WireFormat,
) -> Result<Json, EncodeError> {
    let encoded = logs
        .iter()
        .map(|log| encode_connector_log(log, format))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json::Array(encoded))
}

fn encode_connector_log(log: &ConnectorLog, format: WireFormat) -> Result<Json, EncodeError> {
    let mut object = Map::new();
    object.insert(
        "level".to_string(),
        Json::String(encode_level(log.level).to_string()),
    );
    object.insert("message".to_string(), Json::String(log.message.clone()));
    object.insert(
        "timestamp".to_string(),
        encode_timestamp(&log.timestamp, format)?,
    );
    Ok(Json::Object(object))
}

fn encode_level(level: Level) -> &'static str {
    match level {
        Level::Alert => "alert",
        Level::Info => "info",
    }
}

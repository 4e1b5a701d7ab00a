//! Value encoding for the connector wire format.
//!
//! Every value encodes to a tagged object `{"type": <tag>, "value": ..}`.
//! The rendering of the inner value depends on the [`WireFormat`]; the
//! formatting rules here are wire-compatibility critical.

use chrono::{
    Datelike, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Timelike, Utc,
};
use serde_json::{Map, Value as Json};

use crate::codec::WireFormat;
use crate::error::EncodeError;
use crate::model::{TimeOfDay, Timestamp, Value};

/// Zone conversion of a bare time of day needs a full timestamp, so times
/// are anchored to a fixed reference date first. 2000-01-01 does not fall on
/// a DST transition in any populated zone, so the anchor cannot perturb the
/// wall-clock-to-UTC conversion.
const TIME_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => panic!("invalid time anchor date"),
};

/// Encodes one value to its tagged wire object.
pub fn encode_value(value: &Value, format: WireFormat) -> Result<Json, EncodeError> {
    let encoded = match value {
        Value::Boolean(value) => encode_bool(*value, format),
        Value::Date(date) => encode_date(*date, format),
        Value::DateTime(timestamp) => encode_timestamp(timestamp, format)?,
        Value::Number(number) => encode_number(*number, format)?,
        Value::String(text) => Json::String(text.clone()),
        Value::Time(time) => encode_time(time, format)?,
    };
    let mut object = Map::new();
    object.insert(
        "type".to_string(),
        Json::String(value.kind().as_wire().to_string()),
    );
    object.insert("value".to_string(), encoded);
    Ok(Json::Object(object))
}

fn encode_bool(value: bool, format: WireFormat) -> Json {
    match format {
        WireFormat::V1 => Json::String(if value { "true" } else { "false" }.to_string()),
        WireFormat::V2 => Json::Bool(value),
    }
}

fn encode_date(date: NaiveDate, format: WireFormat) -> Json {
    match format {
        WireFormat::V1 => Json::String(date.format("%Y-%m-%d").to_string()),
        WireFormat::V2 => {
            let mut object = Map::new();
            object.insert("year".to_string(), Json::from(date.year()));
            object.insert("month".to_string(), Json::from(date.month()));
            object.insert("day".to_string(), Json::from(date.day()));
            Json::Object(object)
        }
    }
}

fn encode_number(value: f64, format: WireFormat) -> Result<Json, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFiniteNumber { value });
    }
    match format {
        // Shortest round-tripping decimal rendering: 99 rather than 99.0.
        WireFormat::V1 => Ok(Json::String(value.to_string())),
        WireFormat::V2 => {
            if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
                Ok(Json::from(value as i64))
            } else {
                Ok(Json::from(value))
            }
        }
    }
}

/// Encodes a timestamp, used both for dateTime values and the domain
/// graph's history timestamp.
pub(crate) fn encode_timestamp(
    timestamp: &Timestamp,
    format: WireFormat,
) -> Result<Json, EncodeError> {
    let offset = match timestamp.offset {
        Some(offset) => offset,
        None => local_offset(timestamp.date_time)?,
    };
    let date_time = offset
        .from_local_datetime(&timestamp.date_time)
        .single()
        .ok_or(EncodeError::InvalidLocalTime {
            datetime: timestamp.date_time,
        })?;

    match format {
        WireFormat::V1 => {
            let rendered = if date_time.nanosecond() == 0 {
                date_time.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
            } else {
                date_time.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
            };
            Ok(Json::String(rendered))
        }
        WireFormat::V2 => {
            let utc = date_time.with_timezone(&Utc);
            let mut object = Map::new();
            object.insert("year".to_string(), Json::from(utc.year()));
            object.insert("month".to_string(), Json::from(utc.month()));
            object.insert("day".to_string(), Json::from(utc.day()));
            object.insert("hour".to_string(), Json::from(utc.hour()));
            object.insert("minute".to_string(), Json::from(utc.minute()));
            object.insert("second".to_string(), Json::from(utc.second()));
            Ok(Json::Object(object))
        }
    }
}

fn encode_time(time: &TimeOfDay, format: WireFormat) -> Result<Json, EncodeError> {
    let anchored = TIME_ANCHOR.and_time(time.time);
    let offset = match time.offset {
        Some(offset) => offset,
        None => local_offset(anchored)?,
    };
    let date_time = offset
        .from_local_datetime(&anchored)
        .single()
        .ok_or(EncodeError::InvalidLocalTime { datetime: anchored })?;
    let utc = date_time.with_timezone(&Utc);

    match format {
        WireFormat::V1 => Ok(Json::String(format!("{}Z", utc.format("%H:%M:%S")))),
        WireFormat::V2 => {
            let mut object = Map::new();
            object.insert("hour".to_string(), Json::from(utc.hour()));
            object.insert("minute".to_string(), Json::from(utc.minute()));
            object.insert("second".to_string(), Json::from(utc.second()));
            Ok(Json::Object(object))
        }
    }
}

/// Resolves the local system zone's UTC offset for a wall-clock time.
/// Ambiguous wall-clock times (DST fall-back) take the earlier
/// interpretation; nonexistent ones (DST spring-forward) are an error.
fn local_offset(datetime: NaiveDateTime) -> Result<FixedOffset, EncodeError> {
    match Local.from_local_datetime(&datetime) {
        LocalResult::Single(resolved) => Ok(resolved.offset().fix()),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.offset().fix()),
        LocalResult::None => Err(EncodeError::InvalidLocalTime { datetime }),
    }
}

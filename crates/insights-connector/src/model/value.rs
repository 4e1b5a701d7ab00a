//! Typed attribute values.
//!
//! Values are typed attribute instances assigned to entities and
//! relationships. Timestamps and times of day without an explicit UTC
//! offset are interpreted in the local system timezone at encode time.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

/// Value tags as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Date,
    DateTime,
    Number,
    String,
    Time,
}

impl ValueKind {
    /// Returns the wire tag for this kind.
    pub fn as_wire(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::DateTime => "dateTime",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Time => "time",
        }
    }

    /// Creates a ValueKind from its wire tag.
    pub fn from_wire(tag: &str) -> Option<ValueKind> {
        match tag {
            "boolean" => Some(ValueKind::Boolean),
            "date" => Some(ValueKind::Date),
            "dateTime" => Some(ValueKind::DateTime),
            "number" => Some(ValueKind::Number),
            "string" => Some(ValueKind::String),
            "time" => Some(ValueKind::Time),
            _ => None,
        }
    }
}

/// A point in time, optionally carrying an explicit UTC offset.
///
/// A timestamp without an offset is resolved against the local system
/// timezone when it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Wall-clock date and time in the timestamp's own zone.
    pub date_time: NaiveDateTime,
    /// UTC offset of that zone, or None for the local system zone.
    pub offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Creates a timestamp in the local system timezone.
    pub fn naive(date_time: NaiveDateTime) -> Self {
        Self {
            date_time,
            offset: None,
        }
    }

    /// Creates a timestamp with an explicit UTC offset.
    pub fn with_offset(date_time: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            date_time,
            offset: Some(offset),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(date_time: DateTime<Utc>) -> Self {
        Self::with_offset(date_time.naive_utc(), Utc.fix())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(date_time: DateTime<FixedOffset>) -> Self {
        Self::with_offset(date_time.naive_local(), *date_time.offset())
    }
}

impl From<DateTime<Local>> for Timestamp {
    fn from(date_time: DateTime<Local>) -> Self {
        Self::with_offset(date_time.naive_local(), date_time.offset().fix())
    }
}

/// A time of day, optionally carrying an explicit UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub time: NaiveTime,
    /// UTC offset, or None for the local system zone.
    pub offset: Option<FixedOffset>,
}

impl TimeOfDay {
    /// Creates a time of day in the local system timezone.
    pub fn naive(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }

    /// Creates a time of day with an explicit UTC offset.
    pub fn with_offset(time: NaiveTime, offset: FixedOffset) -> Self {
        Self {
            time,
            offset: Some(offset),
        }
    }
}

/// A typed value that can be assigned to an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),

    /// Calendar date without a time of day.
    Date(NaiveDate),

    /// An instant, normalized to a specific timezone at encode time.
    DateTime(Timestamp),

    /// 64-bit IEEE 754 float (non-finite values are rejected at encode time).
    Number(f64),

    /// Literal text, passed through unchanged.
    String(String),

    /// Zone-aware time of day.
    Time(TimeOfDay),
}

impl Value {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Time(_) => ValueKind::Time,
        }
    }
}

/// Binding of a named attribute type to a value on an entity or relationship.
///
/// The attribute type name must match a type already declared server-side;
/// this is not validated locally.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAssignment {
    pub attribute_type_name: String,
    pub value: Value,
}

impl AttributeAssignment {
    pub fn new(attribute_type_name: impl Into<String>, value: Value) -> Self {
        Self {
            attribute_type_name: attribute_type_name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_mapping() {
        assert_eq!(Value::Boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::Number(1.0).kind(), ValueKind::Number);
        assert_eq!(Value::String("x".to_string()).kind(), ValueKind::String);
    }

    #[test]
    fn test_wire_tag_roundtrip() {
        let kinds = [
            ValueKind::Boolean,
            ValueKind::Date,
            ValueKind::DateTime,
            ValueKind::Number,
            ValueKind::String,
            ValueKind::Time,
        ];
        for kind in kinds {
            assert_eq!(ValueKind::from_wire(kind.as_wire()), Some(kind));
        }
        assert_eq!(ValueKind::from_wire("datetime"), None);
    }
}

//! Connector log lines.

use crate::model::Timestamp;

/// Severity of a connector log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Alert,
    Info,
}

/// A log line submitted by a connector, batched per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorLog {
    pub level: Level,
    pub message: String,
    pub timestamp: Timestamp,
}

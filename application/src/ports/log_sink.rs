//! Port for shipping log records to an external sink.
//!
//! Defines the [`LogSink`] trait for forwarding records (pipeline events and,
//! through the tracing layer in infrastructure, ordinary log lines) to a
//! remote ingestion endpoint.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! local diagnostics, while this port is the injectable side channel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Severity of a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single record shipped to the sink.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Origin of the record: a tracing target or a pipeline event name.
    pub target: String,
    pub message: String,
    /// Structured fields; `Value::Null` when there are none.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub fields: Value,
}

impl LogRecord {
    /// Create a record with the current UTC timestamp.
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: target.into(),
            message: message.into(),
            fields: Value::Null,
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = fields;
        self
    }
}

/// Port for shipping log records.
///
/// `emit` is synchronous and non-fallible. Implementations drop records
/// they cannot deliver.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: LogRecord);
}

/// No-op implementation for tests and when shipping is disabled.
pub struct NoLogSink;

impl LogSink for NoLogSink {
    fn emit(&self, _record: LogRecord) {}
}

/// Delivers every record to each inner sink in order.
pub struct CompositeLogSink {
    delegates: Vec<Arc<dyn LogSink>>,
}

impl CompositeLogSink {
    pub fn new(delegates: Vec<Arc<dyn LogSink>>) -> Self {
        Self { delegates }
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl LogSink for CompositeLogSink {
    fn emit(&self, record: LogRecord) {
        if let Some((last, rest)) = self.delegates.split_last() {
            for d in rest {
                d.emit(record.clone());
            }
            last.emit(record);
        }
    }
}

//! `tracing` layer that forwards events to a [`LogSink`].

use super::http_sink::SINK_TARGET;
use relay_application::{LogLevel, LogRecord, LogSink, PIPELINE_TARGET};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Targets whose events are never forwarded: HTTP-client internals (which
/// would feed back into the sink's own requests), the sink itself, and
/// pipeline milestones that the use case already records in the sink.
const EXCLUDED_TARGETS: &[&str] = &[
    "reqwest",
    "hyper",
    "h2",
    "rustls",
    "tower",
    SINK_TARGET,
    PIPELINE_TARGET,
];

/// Forwards every event at or above `max_level` to a sink.
pub struct LogSinkLayer {
    sink: Arc<dyn LogSink>,
    max_level: Level,
}

impl LogSinkLayer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            max_level: Level::INFO,
        }
    }

    /// Most verbose level forwarded (default: INFO).
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

fn is_excluded(target: &str) -> bool {
    EXCLUDED_TARGETS.iter().any(|prefix| {
        target == *prefix
            || target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with("::") || rest.starts_with('_'))
    })
}

fn level_of(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

impl<S: Subscriber> Layer<S> for LogSinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level || is_excluded(meta.target()) {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let fields = if collector.fields.is_empty() {
            Value::Null
        } else {
            Value::Object(collector.fields)
        };
        self.sink.emit(
            LogRecord::new(level_of(meta.level()), meta.target(), collector.message)
                .with_fields(fields),
        );
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Map<String, Value>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.insert(field.name().to_string(), Value::from(rendered));
        }
    }
}

//! Logging infrastructure: log sink adapters and the tracing bridge.
//!
//! - [`HttpLogSink`]: ships records to a remote ingestion endpoint
//! - [`JsonlLogSink`]: appends records to a local JSONL file
//! - [`LogSinkLayer`]: forwards `tracing` events into any
//!   [`LogSink`](relay_application::LogSink)

mod http_sink;
mod jsonl_sink;
mod layer;

pub use http_sink::{DEFAULT_QUEUE_CAPACITY, HttpLogSink, LogShipper, SINK_TARGET};
pub use jsonl_sink::JsonlLogSink;
pub use layer::LogSinkLayer;

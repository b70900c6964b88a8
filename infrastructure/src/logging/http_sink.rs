//! Remote log shipping over HTTP.

use crate::http::describe;
use relay_application::{LogRecord, LogSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

/// Target for the sink's own diagnostics; never forwarded back into a sink.
pub const SINK_TARGET: &str = "relay_log_sink";

/// Records held in memory while the endpoint is busy.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Ships each record as one JSON `POST` to an ingestion URL.
///
/// `emit` only enqueues; a background task does the I/O, so a slow or
/// failing endpoint never blocks a request. The queue is bounded: records
/// that arrive while it is full are discarded and counted. Undeliverable
/// records are dropped and the first failure is reported once.
pub struct HttpLogSink {
    tx: Sender<LogRecord>,
    dropped: Arc<AtomicU64>,
}

/// Handle on the shipping task, used to drain the queue at shutdown.
///
/// Dropping it closes the queue the same way [`LogShipper::finish`] does,
/// without waiting.
pub struct LogShipper {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl HttpLogSink {
    /// Start the shipping task with [`DEFAULT_QUEUE_CAPACITY`]. Must be
    /// called inside a tokio runtime.
    pub fn spawn(
        client: reqwest::Client,
        url: impl Into<String>,
        token: Option<String>,
    ) -> (Self, LogShipper) {
        Self::spawn_with_capacity(client, url, token, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(
        client: reqwest::Client,
        url: impl Into<String>,
        token: Option<String>,
        capacity: usize,
    ) -> (Self, LogShipper) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (stop, stop_rx) = oneshot::channel();
        let dropped = Arc::new(AtomicU64::new(0));

        let shipper = Shipper {
            client,
            url: url.into(),
            token,
            dropped: Arc::clone(&dropped),
        };
        let handle = tokio::spawn(shipper.run(rx, stop_rx));

        (Self { tx, dropped }, LogShipper { stop, handle })
    }

    /// Records discarded because the queue was full or already closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl LogSink for HttpLogSink {
    fn emit(&self, record: LogRecord) {
        if self.tx.try_send(record).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl LogShipper {
    /// Close the queue, deliver what is already in it and wait up to `grace`
    /// for the task to finish.
    ///
    /// Returns `false` when the queue was not drained in time; the task is
    /// aborted in that case.
    pub async fn finish(self, grace: Duration) -> bool {
        // A send error means the task already exited
        self.stop.send(()).ok();
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(grace, self.handle).await {
            Ok(joined) => joined.is_ok(),
            Err(_) => {
                abort.abort();
                false
            }
        }
    }
}

struct Shipper {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    dropped: Arc<AtomicU64>,
}

impl Shipper {
    async fn run(self, mut rx: Receiver<LogRecord>, mut stop: oneshot::Receiver<()>) {
        let mut reported = false;
        let mut stopping = false;

        loop {
            let record = if stopping {
                rx.recv().await
            } else {
                tokio::select! {
                    biased;
                    record = rx.recv() => record,
                    _ = &mut stop => {
                        rx.close();
                        stopping = true;
                        continue;
                    }
                }
            };
            let Some(record) = record else {
                break;
            };

            if let Some(reason) = self.deliver(&record).await
                && !reported
            {
                warn!(
                    target: SINK_TARGET,
                    "Log sink delivery failed, dropping records: {}",
                    reason
                );
                reported = true;
            }
        }

        let dropped = self.dropped.load(Ordering::Relaxed);
        if dropped > 0 {
            warn!(
                target: SINK_TARGET,
                dropped,
                "Log sink queue overflowed; records were discarded"
            );
        }
    }

    /// `None` on success, otherwise a short failure reason.
    async fn deliver(&self, record: &LogRecord) -> Option<String> {
        let mut request = self.client.post(&self.url).json(record);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => Some(format!("HTTP {}", response.status().as_u16())),
            Err(e) => Some(describe(&e)),
        }
    }
}

//! Local stub servers for adapter tests.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Decoded `application/x-www-form-urlencoded` body, in order.
    pub fn form(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_bytes(&self.body).unwrap()
    }

    /// Decoded query string, in order.
    pub fn query(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_str(self.uri.query().unwrap_or("")).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct StubState<F> {
    tx: UnboundedSender<RecordedRequest>,
    response_factory: Arc<F>,
}

impl<F> Clone for StubState<F> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            response_factory: Arc::clone(&self.response_factory),
        }
    }
}

async fn stub_handler<F>(
    State(state): State<StubState<F>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    F: Fn(&Uri) -> Response + Send + Sync + 'static,
{
    let response = (state.response_factory)(&uri);
    let _ = state.tx.send(RecordedRequest {
        method,
        uri,
        headers,
        body: body.to_vec(),
    });
    response
}

/// Serve every path with `response_factory`, recording each request.
pub async fn spawn_stub_server<F>(
    response_factory: F,
) -> (SocketAddr, UnboundedReceiver<RecordedRequest>)
where
    F: Fn(&Uri) -> Response + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = unbounded_channel();
    let state = StubState {
        tx,
        response_factory: Arc::new(response_factory),
    };

    let app = Router::new().fallback(stub_handler::<F>).with_state(state);

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            eprintln!("stub server exited with error: {err}");
        }
    });
    (addr, rx)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// An address that accepts connections and never answers.
pub async fn silent_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

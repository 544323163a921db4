//! Fire-and-forget HTTP delivery to the collection endpoint.
//!
//! Host contexts can delegate `send_request` and `send_beacon` here. Sends
//! are spawned onto the ambient tokio runtime and never awaited; no response
//! status or body is ever consumed.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;

/// Immediate-mode sends use a plaintext content type on purpose: a JSON
/// content type would force a CORS pre-flight round trip.
const PLAINTEXT_UTF8: &str = "text/plain; charset=UTF-8";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the HTTP layer. Typed for logging only; delivery is
/// best-effort and nothing upstream observes a failure.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no async runtime available")]
    NoRuntime,
}

/// Delivery client bound to one collection endpoint.
#[derive(Clone)]
pub struct Collector {
    client: reqwest::Client,
    collect_url: String,
}

impl Collector {
    /// Build a collector for `endpoint`, which is expected to end in `/`.
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            collect_url: format!("{endpoint}post"),
        }
    }

    /// Target URL for payload posts.
    pub fn collect_url(&self) -> &str {
        &self.collect_url
    }

    /// Immediate-mode delivery: POST the payload and forget it.
    pub fn submit(&self, body: String) {
        if let Err(err) = self.dispatch(body) {
            tracing::debug!("payload delivery dropped: {err}");
        }
    }

    /// Unload-time delivery. Same wire shape as [`Collector::submit`]; kept
    /// separate so hosts with a real beacon primitive can route it there
    /// instead.
    pub fn beacon(&self, body: String) {
        if let Err(err) = self.dispatch(body) {
            tracing::debug!("beacon delivery dropped: {err}");
        }
    }

    fn dispatch(&self, body: String) -> Result<(), TransportError> {
        let handle = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let client = self.client.clone();
        let url = self.collect_url.clone();
        handle.spawn(async move {
            let sent = client
                .post(&url)
                .header(CONTENT_TYPE, PLAINTEXT_UTF8)
                .body(body)
                .send()
                .await;
            if let Err(err) = sent {
                tracing::debug!("collection post failed: {err}");
            }
        });
        Ok(())
    }
}

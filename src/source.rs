//! Registry payload sources.
//!
//! The catalog pulls the raw export through the [`RecordSource`] seam so
//! the HTTP fetch can be swapped out: tests and bundled datasets use
//! [`StaticRecordSource`], production uses [`HttpRecordSource`] against
//! the published registry URL.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::types::RegistryError;

/// Where the raw registry payload comes from. Fetched once per catalog.
pub trait RecordSource: Send + Sync {
    /// Fetch the raw CSV payload.
    fn fetch(&self) -> impl Future<Output = Result<String, RegistryError>> + Send;
}

/// HTTP source for a published registry export.
pub struct HttpRecordSource {
    url: String,
    client: reqwest::Client,
}

impl HttpRecordSource {
    /// Create a source pointing at a registry export URL.
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            url: url.to_string(),
            client,
        }
    }
}

impl RecordSource for HttpRecordSource {
    async fn fetch(&self) -> Result<String, RegistryError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RegistryError::Fetch(self.url.clone(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| RegistryError::Payload(e.to_string()))
    }
}

/// In-memory source: serves a fixed payload and counts fetches.
///
/// Doubles as the instrumentation hook proving that concurrent first
/// callers share a single fetch, and as a way to ship a bundled dataset
/// without any network dependency.
pub struct StaticRecordSource {
    payload: String,
    fetches: Arc<AtomicUsize>,
}

impl StaticRecordSource {
    pub fn new(payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared fetch counter. Clone the handle before moving the source
    /// into a catalog.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl RecordSource for StaticRecordSource {
    async fn fetch(&self) -> Result<String, RegistryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

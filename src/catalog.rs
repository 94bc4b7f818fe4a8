//! Drug catalog: record store, derived indexes, and load coordination.
//!
//! The catalog is constructed once at process start and shared by
//! reference with every caller. The first caller to need the data
//! triggers the fetch+parse+index build; everyone else, including
//! callers arriving mid-build, awaits the same in-flight load. After
//! the build the record store and both indexes are never mutated, so
//! concurrent reads need no locking.

use std::collections::HashMap;

use tokio::sync::OnceCell;

use crate::parser;
use crate::phonetic;
use crate::source::{HttpRecordSource, RecordSource};
use crate::token_index;
use crate::types::DrugRecord;

// ═══════════════════════════════════════════
// CatalogIndex — write-once, then read-only
// ═══════════════════════════════════════════

/// The record store plus both derived indexes.
///
/// A caller either sees "not yet ready" (still awaiting the catalog) or
/// a fully built instance; partially populated indexes are never
/// observable.
pub struct CatalogIndex {
    records: Vec<DrugRecord>,
    token_index: HashMap<String, Vec<u32>>,
    phonetic_index: HashMap<String, Vec<u32>>,
    load_failed: bool,
}

impl CatalogIndex {
    pub(crate) fn build(records: Vec<DrugRecord>) -> Self {
        let token_index = token_index::build(&records);
        let phonetic_index = phonetic::build(&records);
        Self {
            records,
            token_index,
            phonetic_index,
            load_failed: false,
        }
    }

    fn empty_after_failure() -> Self {
        Self {
            records: Vec::new(),
            token_index: HashMap::new(),
            phonetic_index: HashMap::new(),
            load_failed: true,
        }
    }

    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the load degraded to an empty store after a fetch or
    /// parse failure.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub(crate) fn token_positions(&self, key: &str) -> Option<&[u32]> {
        self.token_index.get(key).map(Vec::as_slice)
    }

    pub(crate) fn phonetic_positions(&self, code: &str) -> Option<&[u32]> {
        self.phonetic_index.get(code).map(Vec::as_slice)
    }
}

// ═══════════════════════════════════════════
// DrugCatalog — shared handle + readiness
// ═══════════════════════════════════════════

/// Shared drug catalog: an injectable component owning the record store,
/// both indexes, and the one-time load transition
/// {unloaded → loading → ready}.
pub struct DrugCatalog<S: RecordSource> {
    source: S,
    loaded: OnceCell<CatalogIndex>,
}

impl<S: RecordSource> DrugCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Load and index the registry if nobody has yet; return the shared
    /// index.
    ///
    /// Idempotent. Concurrent callers are coalesced onto one in-flight
    /// load, so the source is fetched exactly once per catalog. A fetch
    /// or parse failure degrades to an empty store; readiness is still
    /// signaled so no waiter hangs, searches simply return nothing, and
    /// the failure is logged for operators.
    pub async fn ensure_loaded(&self) -> &CatalogIndex {
        self.loaded
            .get_or_init(|| async {
                match self.source.fetch().await {
                    Ok(raw) => {
                        let records = parser::parse_registry(&raw);
                        let index = CatalogIndex::build(records);
                        tracing::info!(
                            records = index.records.len(),
                            token_keys = index.token_index.len(),
                            phonetic_keys = index.phonetic_index.len(),
                            "Drug registry indexed"
                        );
                        index
                    }
                    Err(e) => {
                        tracing::error!(
                            "Registry load failed, continuing with empty catalog: {e}"
                        );
                        CatalogIndex::empty_after_failure()
                    }
                }
            })
            .await
    }

    /// Resolve once both indexes are fully built. Never deadlocks: a
    /// failed load still signals readiness (with an empty store).
    pub async fn wait_until_indexed(&self) {
        self.ensure_loaded().await;
    }

    /// Non-blocking readiness probe.
    pub fn is_ready(&self) -> bool {
        self.loaded.get().is_some()
    }
}

impl DrugCatalog<HttpRecordSource> {
    /// Catalog backed by a published registry export over HTTP.
    pub fn from_registry_url(url: &str, timeout_secs: u64) -> Self {
        Self::new(HttpRecordSource::new(url, timeout_secs))
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

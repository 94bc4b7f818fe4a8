//! Core types for the drug registry and its resolver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One canonical drug entry from the reference registry.
///
/// Immutable after load. Records live in a dense vector; a record's
/// position in that vector is its internal handle, used by the indexes
/// so string data is never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Registration identifier: opaque, stable key.
    pub registration_id: String,
    pub generic_name: String,
    /// May be empty: not every registered product carries a brand.
    pub brand_name: String,
    pub strength: String,
    pub form: String,
    pub category: String,
}

/// How a match was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Case-insensitive equality with the generic or brand name.
    Exact,
    /// The name starts with the query.
    Prefix,
    /// The name contains the query.
    Substring,
    /// Reached through a token/prefix index hit with no stronger
    /// textual relationship to the full query.
    Index,
    /// Known transcription alias rewritten to its canonical term.
    Alias,
    /// Sound-code collision with the query.
    Phonetic,
    /// Within the bounded edit-distance threshold.
    Fuzzy,
}

/// A scored candidate for a single query. Produced per call, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub record: DrugRecord,
    pub score: u8,
    pub kind: MatchKind,
}

/// Result of name correction. Confidence 0 means "no correction found";
/// the function never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCorrection {
    pub corrected: String,
    pub confidence: u8,
    pub original: String,
}

/// Errors from fetching or reading the registry payload.
///
/// These never cross the resolver API: the catalog recovers locally by
/// degrading to an empty record store, and searches return no results.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry fetch failed ({0}): {1}")]
    Fetch(String, String),

    #[error("Registry returned HTTP {0}")]
    Status(u16),

    #[error("Registry payload unreadable: {0}")]
    Payload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::Fetch(
            "https://registry.test/export.csv".into(),
            "connection refused".into(),
        );
        assert_eq!(
            err.to_string(),
            "Registry fetch failed (https://registry.test/export.csv): connection refused"
        );

        let err = RegistryError::Status(503);
        assert_eq!(err.to_string(), "Registry returned HTTP 503");
    }

    #[test]
    fn match_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MatchKind::Phonetic).unwrap();
        assert_eq!(json, "\"phonetic\"");
    }
}

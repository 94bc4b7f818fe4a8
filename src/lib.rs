//! medlex — pharmaceutical name resolution.
//!
//! Resolves free-text or voice-transcribed drug names, tolerating typos
//! and transcription noise as well as brand/generic aliasing, to canonical
//! records in a reference registry, ranked by confidence. Built for live
//! autocomplete and for post-processing speech-to-text output: one shared
//! in-memory index, loaded and built exactly once, read without locks by
//! any number of concurrent callers.
//!
//! Construct a [`DrugCatalog`] at process start, share it by reference,
//! and call [`DrugCatalog::search`], [`DrugCatalog::fuzzy_search`],
//! [`DrugCatalog::correct_name`] or [`DrugCatalog::find_exact`]. Callers
//! arriving before the index is built suspend until the single build
//! completes; a failed fetch degrades to an empty catalog rather than an
//! error surface.

pub mod aliases;
pub mod catalog;
pub mod parser;
pub mod phonetic;
pub mod resolver;
pub mod source;
pub mod token_index;
pub mod types;

pub use catalog::{CatalogIndex, DrugCatalog};
pub use source::{HttpRecordSource, RecordSource, StaticRecordSource};
pub use types::{DrugRecord, Match, MatchKind, NameCorrection, RegistryError};

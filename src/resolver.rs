//! Search, fuzzy matching and name correction over a built catalog.
//!
//! The primary path answers autocomplete: candidates come from the token
//! index and are scored textually, with early termination on large
//! unions. The fuzzy path layers the recovery tiers for voice-transcribed
//! input (alias rewrite, indexed search, phonetic collision, bounded edit
//! distance) in strict priority order so results stay deterministic and
//! explainable.

use std::collections::HashSet;

use crate::aliases;
use crate::catalog::{CatalogIndex, DrugCatalog};
use crate::phonetic;
use crate::source::RecordSource;
use crate::token_index;
use crate::types::{DrugRecord, Match, MatchKind, NameCorrection};

/// Queries shorter than this (after trimming) are too ambiguous to answer.
const MIN_QUERY_LEN: usize = 2;

/// Stop scanning once this many candidates are scored per requested
/// result, provided a strong match has already been seen.
const EARLY_STOP_FACTOR: usize = 3;

/// The edit-distance tier scans at most this many records. A full-dataset
/// Levenshtein pass is the one cost this engine refuses to pay per query.
const EDIT_SCAN_LIMIT: usize = 500;

/// Edit-distance budget used when correcting a name without an explicit cap.
const CORRECTION_EDIT_DISTANCE: usize = 2;

const SCORE_EXACT: u8 = 100;
const SCORE_ALIAS: u8 = 95;
const SCORE_INDEXED: u8 = 90;
const SCORE_PREFIX: u8 = 80;
const SCORE_PHONETIC: u8 = 70;
const SCORE_SUBSTRING: u8 = 60;
const SCORE_TOKEN: u8 = 40;
const SCORE_FUZZY_BASE: u8 = 60;
const SCORE_FUZZY_STEP: u8 = 15;
const SCORE_FUZZY_FLOOR: u8 = 20;

// ═══════════════════════════════════════════
// Public async surface
// ═══════════════════════════════════════════

impl<S: RecordSource> DrugCatalog<S> {
    /// Exact/prefix/substring search for autocomplete.
    ///
    /// Awaits index readiness, so a call arriving mid-build suspends
    /// until the build completes rather than reading a partial index.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Match> {
        self.ensure_loaded().await.search(query, limit)
    }

    /// Layered fuzzy search for noisy input: alias, indexed, phonetic,
    /// then bounded edit distance.
    pub async fn fuzzy_search(
        &self,
        query: &str,
        limit: usize,
        max_edit_distance: usize,
    ) -> Vec<Match> {
        self.ensure_loaded()
            .await
            .fuzzy_search(query, limit, max_edit_distance)
    }

    /// Correct a transcribed name to its most plausible canonical form.
    /// Never fails; confidence 0 means "no correction found".
    pub async fn correct_name(&self, query: &str) -> NameCorrection {
        self.ensure_loaded().await.correct_name(query)
    }

    /// Record whose generic or brand name equals `name`, case-insensitively.
    pub async fn find_exact(&self, name: &str) -> Option<DrugRecord> {
        self.ensure_loaded().await.find_exact(name)
    }
}

// ═══════════════════════════════════════════
// Scoring over a built index
// ═══════════════════════════════════════════

impl CatalogIndex {
    /// Exact/prefix/substring search. See [`DrugCatalog::search`].
    pub fn search(&self, query: &str, limit: usize) -> Vec<Match> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN || limit == 0 {
            return Vec::new();
        }
        let normalized = trimmed.to_lowercase();
        let normalized = match aliases::canonical_for(&normalized) {
            Some(canonical) => canonical.to_string(),
            None => normalized,
        };

        let mut matches = Vec::new();
        let mut strong_match = false;
        for pos in self.candidate_positions(&normalized) {
            let record = &self.records()[pos as usize];
            let (score, kind) = score_candidate(record, &normalized);
            if score >= SCORE_PREFIX {
                strong_match = true;
            }
            matches.push(Match {
                record: record.clone(),
                score,
                kind,
            });
            // Bounds worst-case latency on large candidate unions.
            if strong_match && matches.len() >= limit * EARLY_STOP_FACTOR {
                break;
            }
        }

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);
        matches
    }

    /// Layered fuzzy search. See [`DrugCatalog::fuzzy_search`].
    pub fn fuzzy_search(
        &self,
        query: &str,
        limit: usize,
        max_edit_distance: usize,
    ) -> Vec<Match> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN || limit == 0 {
            return Vec::new();
        }
        let normalized = trimmed.to_lowercase();

        let mut matches: Vec<Match> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        // Tier 1: known transcription alias, rewritten to its canonical
        // term for every later tier.
        let lookup = match aliases::canonical_for(&normalized) {
            Some(canonical) => {
                for record in self.records() {
                    if matches.len() >= limit {
                        break;
                    }
                    if name_equals(record, canonical) {
                        seen.insert(record.registration_id.clone());
                        matches.push(Match {
                            record: record.clone(),
                            score: SCORE_ALIAS,
                            kind: MatchKind::Alias,
                        });
                    }
                }
                canonical.to_string()
            }
            None => normalized,
        };

        // Tier 2: standard indexed search on the (possibly rewritten) query.
        if matches.len() < limit {
            for hit in self.search(&lookup, limit) {
                if matches.len() >= limit {
                    break;
                }
                if !seen.insert(hit.record.registration_id.clone()) {
                    continue;
                }
                matches.push(Match {
                    record: hit.record,
                    score: SCORE_INDEXED,
                    kind: MatchKind::Index,
                });
            }
        }

        // Tier 3: sound-code collision.
        if matches.len() < limit {
            if let Some(code) = phonetic::encode(&lookup) {
                if let Some(hits) = self.phonetic_positions(&code) {
                    for &pos in hits {
                        if matches.len() >= limit {
                            break;
                        }
                        let record = &self.records()[pos as usize];
                        if !seen.insert(record.registration_id.clone()) {
                            continue;
                        }
                        matches.push(Match {
                            record: record.clone(),
                            score: SCORE_PHONETIC,
                            kind: MatchKind::Phonetic,
                        });
                    }
                }
            }
        }

        // Tier 4: bounded edit-distance scan. Short queries get a strict
        // absolute cap, long queries a proportionally looser one.
        if matches.len() < limit {
            let query_len = lookup.chars().count();
            let threshold = max_edit_distance.max(query_len / 3);
            for record in self.records().iter().take(EDIT_SCAN_LIMIT) {
                if matches.len() >= limit {
                    break;
                }
                if seen.contains(record.registration_id.as_str()) {
                    continue;
                }
                // Length gap already exceeds the threshold: skip the DP.
                let generic_close =
                    record.generic_name.chars().count().abs_diff(query_len) <= threshold;
                let brand_close = !record.brand_name.is_empty()
                    && record.brand_name.chars().count().abs_diff(query_len) <= threshold;
                if !generic_close && !brand_close {
                    continue;
                }
                let distance = name_distance(record, &lookup);
                if distance > threshold {
                    continue;
                }
                seen.insert(record.registration_id.clone());
                matches.push(Match {
                    record: record.clone(),
                    score: fuzzy_score(distance),
                    kind: MatchKind::Fuzzy,
                });
            }
        }

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);
        matches
    }

    /// Correct a transcribed name. See [`DrugCatalog::correct_name`].
    pub fn correct_name(&self, query: &str) -> NameCorrection {
        let original = query.to_string();
        let normalized = query.trim().to_lowercase();
        if normalized.chars().count() < MIN_QUERY_LEN {
            return NameCorrection {
                corrected: original.clone(),
                confidence: 0,
                original,
            };
        }

        if let Some(canonical) = aliases::canonical_for(&normalized) {
            return NameCorrection {
                corrected: canonical.to_string(),
                confidence: SCORE_ALIAS,
                original,
            };
        }

        if self.find_exact(&normalized).is_some() {
            return NameCorrection {
                corrected: normalized,
                confidence: SCORE_EXACT,
                original,
            };
        }

        if let Some(best) = self
            .fuzzy_search(&normalized, 1, CORRECTION_EDIT_DISTANCE)
            .into_iter()
            .next()
        {
            let corrected = closest_name(&best.record, &normalized);
            return NameCorrection {
                corrected,
                confidence: best.score,
                original,
            };
        }

        NameCorrection {
            corrected: original.clone(),
            confidence: 0,
            original,
        }
    }

    /// Record whose generic or brand name equals `name`, case-insensitively.
    pub fn find_exact(&self, name: &str) -> Option<DrugRecord> {
        let target = name.trim().to_lowercase();
        if target.is_empty() {
            return None;
        }
        self.records()
            .iter()
            .find(|record| name_equals(record, &target))
            .cloned()
    }

    /// Union of token-index position sets for every query word, in
    /// encounter order. An empty union means an empty result; the
    /// primary path never falls back to a full scan.
    fn candidate_positions(&self, normalized_query: &str) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut positions = Vec::new();
        for word in token_index::tokenize(normalized_query) {
            if let Some(hits) = self.token_positions(&word) {
                for &pos in hits {
                    if seen.insert(pos) {
                        positions.push(pos);
                    }
                }
            }
        }
        positions
    }
}

// ═══════════════════════════════════════════
// Scoring helpers
// ═══════════════════════════════════════════

fn score_candidate(record: &DrugRecord, query: &str) -> (u8, MatchKind) {
    let generic = record.generic_name.to_lowercase();
    let brand = record.brand_name.to_lowercase();

    if generic == query || brand == query {
        (SCORE_EXACT, MatchKind::Exact)
    } else if generic.starts_with(query) || brand.starts_with(query) {
        (SCORE_PREFIX, MatchKind::Prefix)
    } else if generic.contains(query) || brand.contains(query) {
        (SCORE_SUBSTRING, MatchKind::Substring)
    } else {
        (SCORE_TOKEN, MatchKind::Index)
    }
}

fn name_equals(record: &DrugRecord, target: &str) -> bool {
    record.generic_name.to_lowercase() == target
        || (!record.brand_name.is_empty() && record.brand_name.to_lowercase() == target)
}

/// Minimum edit distance between the query and either name.
fn name_distance(record: &DrugRecord, query: &str) -> usize {
    let generic = edit_distance(&record.generic_name.to_lowercase(), query);
    if record.brand_name.is_empty() {
        return generic;
    }
    generic.min(edit_distance(&record.brand_name.to_lowercase(), query))
}

fn fuzzy_score(distance: usize) -> u8 {
    let penalty = distance as u32 * u32::from(SCORE_FUZZY_STEP);
    let scored = u32::from(SCORE_FUZZY_BASE).saturating_sub(penalty);
    scored.max(u32::from(SCORE_FUZZY_FLOOR)) as u8
}

/// Levenshtein distance, two-row dynamic programming.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Which of the record's names the correction should surface: the
/// generic, unless the brand is strictly closer to what was typed.
fn closest_name(record: &DrugRecord, query: &str) -> String {
    let generic = record.generic_name.to_lowercase();
    let brand = record.brand_name.to_lowercase();
    if !brand.is_empty() && edit_distance(&brand, query) < edit_distance(&generic, query) {
        brand
    } else {
        generic
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

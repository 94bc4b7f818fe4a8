//! Known-misspelling table for voice and free-text input.
//!
//! Voice transcription mangles drug names in predictable ways: dropped
//! syllables and phonetic spellings of well-known generics. The worst
//! offenders are fixed here with a direct rewrite to
//! the canonical search term, consulted before any indexed lookup. Lookup
//! is an exact key match on the lower-cased, trimmed query; anything not
//! in the table falls through to indexed search.

/// Misheard/misspelled form → canonical term.
/// Sorted by key for binary search. Keys and values must be lowercase.
const KNOWN_ALIASES: &[(&str, &str)] = &[
    ("amlodipin", "amlodipine"),
    ("amoxicilin", "amoxicillin"),
    ("amoxycillin", "amoxicillin"),
    ("aspirine", "aspirin"),
    ("asprin", "aspirin"),
    ("atorvastatine", "atorvastatin"),
    ("cetirizin", "cetirizine"),
    ("ciproflaxin", "ciprofloxacin"),
    ("ibuprofin", "ibuprofen"),
    ("levothyroxin", "levothyroxine"),
    ("lisinoprill", "lisinopril"),
    ("loratidine", "loratadine"),
    ("metaflorin", "metformin"),
    ("methformin", "metformin"),
    ("metroprolol", "metoprolol"),
    ("omeprazol", "omeprazole"),
    ("paracetemol", "paracetamol"),
    ("parasetamol", "paracetamol"),
    ("prednisolon", "prednisolone"),
    ("salbutamal", "salbutamol"),
    ("simvastatine", "simvastatin"),
    ("siprofloxacin", "ciprofloxacin"),
    ("warfarine", "warfarin"),
];

/// Canonical term for a known bad transcription, if any.
pub fn canonical_for(term: &str) -> Option<&'static str> {
    let key = term.trim().to_lowercase();
    KNOWN_ALIASES
        .binary_search_by_key(&key.as_str(), |&(alias, _)| alias)
        .ok()
        .map(|i| KNOWN_ALIASES[i].1)
}

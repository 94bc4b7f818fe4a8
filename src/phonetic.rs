//! Sound-equivalence codes and the phonetic index.
//!
//! Voice transcription tends to preserve the opening sound and rough
//! syllable shape of a drug name even when the exact letters are wrong
//! ("metfornin" for "metformin"). Names are reduced to a fixed-length
//! Soundex-style code so that sound-alike spellings collide; the index
//! from code to record positions serves as a cheap fallback tier behind
//! the token index.

use std::collections::HashMap;

use crate::types::DrugRecord;

/// Fixed code length: first letter plus up to five class digits.
pub const CODE_LEN: usize = 6;

/// Consonant class, or `None` for vowels, h/w/y and anything else.
fn class_of(c: char) -> Option<u8> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some(1),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some(2),
        'd' | 't' => Some(3),
        'l' => Some(4),
        'm' | 'n' => Some(5),
        'r' => Some(6),
        _ => None,
    }
}

/// Encode a name into its fixed-length sound code.
///
/// The uppercased first letter heads the code and seeds the previous-class
/// tracker. Walking the remaining letters, each consonant appends its class
/// digit unless it repeats the immediately preceding class; vowels, h, w, y
/// and non-alphabetic characters append nothing and reset the tracker, so a
/// repeated class after a vowel is kept. The result is padded with `0` or
/// truncated to [`CODE_LEN`]. Returns `None` when the name has no letters
/// (an empty brand field, strength-only junk rows).
pub fn encode(name: &str) -> Option<String> {
    let lower = name.trim().to_lowercase();
    let mut chars = lower.chars();
    let first = chars.find(|c| c.is_ascii_alphabetic())?;

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first.to_ascii_uppercase());
    let mut prev = class_of(first);

    for c in chars {
        if code.len() == CODE_LEN {
            break;
        }
        if !c.is_ascii_alphabetic() {
            prev = None;
            continue;
        }
        match class_of(c) {
            Some(digit) => {
                if prev != Some(digit) {
                    code.push(char::from(b'0' + digit));
                }
                prev = Some(digit);
            }
            None => prev = None,
        }
    }

    while code.len() < CODE_LEN {
        code.push('0');
    }
    Some(code)
}

/// Build the phonetic index: sound code → record positions.
///
/// Brand and generic names are both encoded; when the two codes differ,
/// the record is reachable through either.
pub fn build(records: &[DrugRecord]) -> HashMap<String, Vec<u32>> {
    let mut index: HashMap<String, Vec<u32>> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        let pos = pos as u32;
        let generic = encode(&record.generic_name);
        let brand = encode(&record.brand_name);

        if let Some(code) = &generic {
            index.entry(code.clone()).or_default().push(pos);
        }
        if let Some(code) = brand {
            if generic.as_deref() != Some(code.as_str()) {
                index.entry(code).or_default().push(pos);
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(generic: &str, brand: &str) -> DrugRecord {
        DrugRecord {
            registration_id: "MAL000".into(),
            generic_name: generic.into(),
            brand_name: brand.into(),
            strength: "500 mg".into(),
            form: "Tablet".into(),
            category: "Test".into(),
        }
    }

    #[test]
    fn codes_are_fixed_length() {
        assert_eq!(encode("Metformin").unwrap(), "M31655");
        assert_eq!(encode("Ab").unwrap(), "A10000"); // padded
        assert_eq!(
            encode("Trimethoprim-Sulfamethoxazole").unwrap().len(),
            CODE_LEN
        ); // truncated
    }

    #[test]
    fn transcription_error_collides() {
        // The classic voice-input shape error: syllable preserved, letters wrong.
        assert_eq!(encode("metfornin"), encode("metformin"));
        assert_eq!(encode("metformine"), encode("metformin"));
    }

    #[test]
    fn leading_consonant_distinguishes() {
        assert_ne!(encode("netformin"), encode("metformin"));
    }

    #[test]
    fn vowel_resets_duplicate_collapse() {
        // x and c share class 2 but an i sits between them: both kept.
        assert_eq!(encode("Amoxicillin").unwrap(), "A52245");
        // Adjacent duplicates with no vowel between collapse.
        assert_eq!(encode("Abba").unwrap(), "A10000");
        assert_eq!(encode("Ab-ba").unwrap(), "A11000");
    }

    #[test]
    fn no_letters_yields_no_code() {
        assert_eq!(encode(""), None);
        assert_eq!(encode("   "), None);
        assert_eq!(encode("500"), None);
    }

    #[test]
    fn index_covers_generic_and_brand() {
        let records = vec![record("Metformin", "Glucophage")];
        let index = build(&records);
        assert_eq!(index.get("M31655"), Some(&vec![0]));
        assert!(index.contains_key(&encode("Glucophage").unwrap()));
    }

    #[test]
    fn identical_codes_indexed_once() {
        // Generic and brand that encode identically should not duplicate
        // the position under one key.
        let records = vec![record("Metformin", "Metformine")];
        let index = build(&records);
        assert_eq!(index.get("M31655"), Some(&vec![0]));
    }

    #[test]
    fn empty_brand_is_skipped() {
        let records = vec![record("Paracetamol", "")];
        let index = build(&records);
        assert_eq!(index.len(), 1);
        assert!(index.contains_key(&encode("Paracetamol").unwrap()));
    }
}

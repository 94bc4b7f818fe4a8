//! Word and word-prefix inverted index over the record store.
//!
//! Every word of the generic and brand names is indexed under the full
//! word and under every prefix of length 2 up to one short of the word,
//! so "start typing and match" works without the user finishing the word.
//! Index size grows with total character count; lookup stays O(1)
//! expected per token.

use std::collections::HashMap;

use crate::types::DrugRecord;

/// Words and prefixes shorter than this are too ambiguous to index.
pub const MIN_TOKEN_LEN: usize = 2;

/// Lower-cased whitespace-delimited words of length ≥ [`MIN_TOKEN_LEN`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

/// Build the token index: word/prefix → record positions.
pub fn build(records: &[DrugRecord]) -> HashMap<String, Vec<u32>> {
    let mut index: HashMap<String, Vec<u32>> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        let pos = pos as u32;
        for word in tokenize(&record.generic_name)
            .iter()
            .chain(tokenize(&record.brand_name).iter())
        {
            insert_word(&mut index, word, pos);
        }
    }
    index
}

fn insert_word(index: &mut HashMap<String, Vec<u32>>, word: &str, pos: u32) {
    push_position(index, word, pos);
    let chars: Vec<char> = word.chars().collect();
    for len in MIN_TOKEN_LEN..chars.len() {
        let prefix: String = chars[..len].iter().collect();
        push_position(index, &prefix, pos);
    }
}

/// Positions are appended in record order, so a duplicate from the same
/// record (word in both names, repeated word) is always the last entry.
fn push_position(index: &mut HashMap<String, Vec<u32>>, key: &str, pos: u32) {
    let entry = index.entry(key.to_string()).or_default();
    if entry.last() != Some(&pos) {
        entry.push(pos);
    }
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
    fn tokenize_lowercases_and_filters() {
        assert_eq!(tokenize("Panadol Extra"), vec!["panadol", "extra"]);
        assert_eq!(tokenize("Vitamin A"), vec!["vitamin"]); // "A" too short
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn every_prefix_maps_to_owner() {
        let records = vec![record("Paracetamol", "")];
        let index = build(&records);

        let word = "paracetamol";
        for len in MIN_TOKEN_LEN..=word.len() {
            let key = &word[..len];
            assert_eq!(
                index.get(key),
                Some(&vec![0]),
                "prefix {key:?} missing from index"
            );
        }
    }

    #[test]
    fn shorter_prefix_set_is_superset() {
        let records = vec![
            record("Metformin", ""),
            record("Metoprolol", ""),
            record("Paracetamol", ""),
        ];
        let index = build(&records);

        let met = index.get("met").unwrap();
        let metf = index.get("metf").unwrap();
        assert!(metf.iter().all(|pos| met.contains(pos)));
        assert_eq!(met.len(), 2);
        assert_eq!(metf, &vec![0]);
    }

    #[test]
    fn brand_words_indexed_too() {
        let records = vec![record("Paracetamol", "Panadol Extra")];
        let index = build(&records);
        assert_eq!(index.get("panadol"), Some(&vec![0]));
        assert_eq!(index.get("extra"), Some(&vec![0]));
        assert_eq!(index.get("ex"), Some(&vec![0]));
    }

    #[test]
    fn duplicate_word_across_names_indexed_once() {
        let records = vec![record("Metformin", "Metformin")];
        let index = build(&records);
        assert_eq!(index.get("metformin"), Some(&vec![0]));
        assert_eq!(index.get("me"), Some(&vec![0]));
    }

    #[test]
    fn two_letter_word_has_no_prefixes() {
        let records = vec![record("Po Chai", "")];
        let index = build(&records);
        assert_eq!(index.get("po"), Some(&vec![0]));
        assert!(!index.contains_key("p"));
    }

    #[test]
    fn single_letter_words_ignored() {
        let records = vec![record("Vitamin D", "")];
        let index = build(&records);
        assert!(index.contains_key("vitamin"));
        assert!(!index.contains_key("d"));
    }
}

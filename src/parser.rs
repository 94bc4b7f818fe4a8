//! Registry payload parsing.
//!
//! The published registry export is a flat CSV: one header line, then one
//! row per registered product. Rows that cannot yield a full record are
//! skipped rather than failing the whole load; the export is maintained
//! by hand upstream and short rows do appear.

use csv::ReaderBuilder;

use crate::types::DrugRecord;

/// Fields a row must carry: id, generic, brand, strength, form, category.
const REQUIRED_FIELDS: usize = 6;

/// Parse the raw registry CSV into records.
///
/// The header line is skipped; quoted fields may contain the separator.
/// Malformed rows (too few fields, broken quoting) are skipped and
/// counted, never fatal.
pub fn parse_registry(raw: &str) -> Vec<DrugRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if row.len() < REQUIRED_FIELDS {
            skipped += 1;
            continue;
        }
        records.push(DrugRecord {
            registration_id: row[0].trim().to_string(),
            generic_name: row[1].trim().to_string(),
            brand_name: row[2].trim().to_string(),
            strength: row[3].trim().to_string(),
            form: row[4].trim().to_string(),
            category: row[5].trim().to_string(),
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped malformed registry rows");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
registration_id,generic_name,brand_name,strength,form,category
MAL20001234A,Metformin,Glucophage,500 mg,Tablet,Biguanide
MAL20005678X,Ciprofloxacin,Ciprobay,250 mg,Tablet,\"Antibiotic, fluoroquinolone\"
MAL20009999Z,Paracetamol
MAL20002468B, Amoxicillin , Amoxil ,250 mg,Capsule,Penicillin
";

    #[test]
    fn header_skipped_and_rows_parsed() {
        let records = parse_registry(SAMPLE);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].registration_id, "MAL20001234A");
        assert_eq!(records[0].generic_name, "Metformin");
        assert_eq!(records[0].brand_name, "Glucophage");
    }

    #[test]
    fn quoted_field_keeps_separator() {
        let records = parse_registry(SAMPLE);
        assert_eq!(records[1].category, "Antibiotic, fluoroquinolone");
    }

    #[test]
    fn short_row_skipped() {
        let records = parse_registry(SAMPLE);
        assert!(records
            .iter()
            .all(|r| r.registration_id != "MAL20009999Z"));
    }

    #[test]
    fn fields_trimmed() {
        let records = parse_registry(SAMPLE);
        assert_eq!(records[2].generic_name, "Amoxicillin");
        assert_eq!(records[2].brand_name, "Amoxil");
    }

    #[test]
    fn empty_payload_yields_no_records() {
        assert!(parse_registry("").is_empty());
        assert!(parse_registry("registration_id,generic_name\n").is_empty());
    }

    #[test]
    fn extra_fields_tolerated() {
        let raw = "\
id,generic,brand,strength,form,category
MAL1,Metformin,Glucophage,500 mg,Tablet,Biguanide,extra,columns
";
        let records = parse_registry(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Biguanide");
    }
}

//! Bulk import file parsing and validation.
//!
//! Import files are plain text, one product per line, `;`-delimited,
//! in strict positional order: `name;cost;quantity;status;category_id`.
//! Parsing is pure; insertion (and the all-or-nothing transaction) is
//! the store's job.

use crate::{IMPORT_FIELD_COUNT, IMPORT_SEPARATOR};
use thiserror::Error;

/// Per-line import validation errors. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Empty line, or a field count other than five.
    #[error("incorrect line {line}, please review file")]
    MalformedLine { line: usize },

    #[error("line {line}: '{value}' is not an integer")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: value must be over 0")]
    NegativeValue { line: usize },
}

/// One validated import record.
///
/// `status` is carried verbatim from the file; the import path does not
/// validate it against the status enumeration. Existing import files
/// carry values outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    pub status: String,
    pub category_id: i64,
}

/// Parse a whole import file.
///
/// Every line must be valid; the first failure aborts the parse so the
/// caller commits nothing. An empty input yields an empty batch.
pub fn parse_lines(input: &str) -> Result<Vec<ImportRecord>, ImportError> {
    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        records.push(parse_line(idx + 1, line)?);
    }
    Ok(records)
}

/// Parse a single line, trimming surrounding whitespace first.
pub fn parse_line(line_no: usize, line: &str) -> Result<ImportRecord, ImportError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ImportError::MalformedLine { line: line_no });
    }

    let fields: Vec<&str> = line.split(IMPORT_SEPARATOR).collect();
    if fields.len() != IMPORT_FIELD_COUNT {
        return Err(ImportError::MalformedLine { line: line_no });
    }

    let cost = parse_int(line_no, fields[1])?;
    let quantity = parse_int(line_no, fields[2])?;
    if cost < 0 || quantity < 0 {
        return Err(ImportError::NegativeValue { line: line_no });
    }
    let category_id = parse_int(line_no, fields[4])?;

    Ok(ImportRecord {
        name: fields[0].to_string(),
        cost,
        quantity,
        status: fields[3].to_string(),
        category_id,
    })
}

fn parse_int(line_no: usize, value: &str) -> Result<i64, ImportError> {
    value.parse::<i64>().map_err(|_| ImportError::InvalidNumber {
        line: line_no,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_file() {
        let records =
            parse_lines("Red Shoe;50;10;AVAILABLE;1\nBlue Hat;20;5;AVAILABLE;1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ImportRecord {
                name: "Red Shoe".to_string(),
                cost: 50,
                quantity: 10,
                status: "AVAILABLE".to_string(),
                category_id: 1,
            }
        );
        assert_eq!(records[1].name, "Blue Hat");
        assert_eq!(records[1].cost, 20);
        assert_eq!(records[1].quantity, 5);
    }

    #[test]
    fn empty_input_is_an_empty_batch() {
        assert!(parse_lines("").unwrap().is_empty());
    }

    #[test]
    fn blank_line_is_malformed() {
        let err = parse_lines("A;1;1;AVAILABLE;1\n\nB;1;1;AVAILABLE;1").unwrap_err();
        assert!(matches!(err, ImportError::MalformedLine { line: 2 }));
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let err = parse_line(1, "A;1;1;AVAILABLE").unwrap_err();
        assert!(matches!(err, ImportError::MalformedLine { line: 1 }));
        let err = parse_line(3, "A;1;1;AVAILABLE;1;extra").unwrap_err();
        assert!(matches!(err, ImportError::MalformedLine { line: 3 }));
    }

    #[test]
    fn non_numeric_cost_propagates_parse_error() {
        let err = parse_line(2, "A;free;1;AVAILABLE;1").unwrap_err();
        assert!(matches!(err, ImportError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn negative_cost_and_quantity_are_rejected() {
        let err = parse_line(1, "A;-5;1;AVAILABLE;1").unwrap_err();
        assert!(err.to_string().contains("value must be over 0"));
        let err = parse_line(1, "A;5;-1;AVAILABLE;1").unwrap_err();
        assert!(matches!(err, ImportError::NegativeValue { line: 1 }));
    }

    #[test]
    fn line_whitespace_is_trimmed_before_parsing() {
        let record = parse_line(1, "  Red Shoe;50;10;AVAILABLE;1  \r").unwrap();
        assert_eq!(record.name, "Red Shoe");
        assert_eq!(record.category_id, 1);
    }

    #[test]
    fn status_is_taken_verbatim() {
        let record = parse_line(1, "A;1;1;NOT_A_REAL_STATUS;1").unwrap();
        assert_eq!(record.status, "NOT_A_REAL_STATUS");
    }
}

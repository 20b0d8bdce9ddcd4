//! Roster CSV parsing.
//!
//! Columns: class, name, login, password. No header row. Rows with fewer
//! than 4 columns or an empty first column are dropped and counted.
//! The delimiter (`,` `;` tab `|`) is guessed from the first non-blank line.
//!
//! CHANGELOG:
//! - 10/17/2026 - Delimiter detection for `;`-separated spreadsheet exports
//! - 10/15/2026 - Count dropped rows instead of discarding silently
//! - 10/14/2026 - Initial implementation

use super::record::StudentRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// Result of parsing one CSV document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    pub records: Vec<StudentRecord>,
    /// Rows that failed the column/first-field check.
    pub skipped: usize,
}

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Guess the field delimiter: the candidate occurring most often on the
/// first non-blank line. Comma when nothing matches.
pub fn detect_delimiter(input: &str) -> u8 {
    let Some(line) = input.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut best = (b',', 0);
    for delimiter in DELIMITERS {
        let count = line.bytes().filter(|b| *b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

/// Parse CSV text into student records.
///
/// Malformed rows are skipped, not reported as errors. A structural CSV
/// error (e.g. invalid UTF-8 in the middle of the input) aborts the whole
/// parse so no partial roster escapes.
pub fn parse_roster_csv(input: &str) -> Result<ParsedRoster, csv::Error> {
    let delimiter = detect_delimiter(input);
    if delimiter != b',' {
        debug!(delimiter = %char::from(delimiter).escape_default(), "non-comma roster delimiter");
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let mut parsed = ParsedRoster::default();
    for row in reader.records() {
        let row = row?;
        match record_from_row(&row) {
            Some(record) => parsed.records.push(record),
            None => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

fn record_from_row(row: &StringRecord) -> Option<StudentRecord> {
    if row.len() < 4 {
        return None;
    }
    let class_name = row.get(0)?.trim();
    if class_name.is_empty() {
        return None;
    }

    Some(StudentRecord::new(
        class_name,
        row.get(1)?.trim(),
        row.get(2)?.trim(),
        row.get(3)?.trim(),
    ))
}

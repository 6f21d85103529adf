//! # Delimited Text Reading
//!
//! Reads `.csv` uploads into a [`RecordTable`]. The delimiter is sniffed from
//! the first lines, the first record is the header, null literals become
//! missing values and each column is typed as a whole: numeric when every
//! present cell is a number, boolean when every present cell is `true` or
//! `false`, text otherwise.

use crate::error::DashboardError;
use crate::helpers::reader::UploadedFile;
use crate::helpers::text::decode;
use crate::loader::criteria::Criteria;
use crate::table::value::parse_bool;
use crate::table::value::parse_number;
use crate::table::Column;
use crate::table::ColumnType;
use crate::table::RecordTable;
use crate::table::Value;
use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

/// Candidate delimiters, in order of preference on equal scores
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of lines sampled for delimiter detection
const SAMPLE_LINES: usize = 10;

#[derive(Error, Debug)]
pub enum DelimitedError {
    #[error("No columns to parse from '{0}'")]
    MissingHeaderRow(String),
}

/// Reads delimited text into a typed record table.
pub(crate) fn read_delimited(upload: &UploadedFile, criteria: &Criteria) -> Result<RecordTable, DashboardError> {
    let text = decode(&upload.bytes);
    let delimiter = detect_delimiter(&text);
    debug!(file = upload.name, delimiter = %(delimiter as char).escape_default(), "detected delimiter");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers = None::<Vec<String>>;
    let mut records = Vec::<Vec<String>>::new();
    let mut dropped_fields = 0usize;
    for result in reader.records() {
        let record = result?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        match &headers {
            None => headers = Some(record.iter().map(str::to_owned).collect()),
            Some(headers) => {
                dropped_fields += record.len().saturating_sub(headers.len());
                records.push(record.iter().map(str::to_owned).collect());
            }
        }
    }
    let headers = headers.ok_or_else(|| DelimitedError::MissingHeaderRow(upload.name.to_owned()))?;
    if dropped_fields > 0 {
        warn!(file = upload.name, dropped_fields, "rows longer than the header were truncated");
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let cells: Vec<Option<&str>> = records
                .iter()
                .map(|record| record.get(index).map(String::as_str).filter(|text| !criteria.is_null(text)))
                .collect();
            Column::new(name, type_cells(&cells))
        })
        .collect();
    Ok(RecordTable { columns })
}

/// Picks the delimiter that appears most often and most consistently outside
/// quoted sections of the first lines. Defaults to a comma.
pub(crate) fn detect_delimiter(text: &str) -> u8 {
    let sample_lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();
    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0f64;
    for delimiter in DELIMITERS {
        let counts: Vec<f64> = sample_lines
            .iter()
            .map(|line| count_unquoted(line, delimiter) as f64)
            .collect();
        let average = counts.iter().sum::<f64>() / counts.len() as f64;
        let variance = counts.iter().map(|count| (count - average).powi(2)).sum::<f64>() / counts.len() as f64;
        let score = average / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }
    best_delimiter
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut is_quoted = false;
    let mut count = 0usize;
    for byte in line.bytes() {
        match byte {
            b'"' => is_quoted = !is_quoted,
            _ if !is_quoted && byte == delimiter => count += 1,
            _ => (),
        }
    }
    count
}

/// Types a column of raw cells as a whole.
fn type_cells(cells: &[Option<&str>]) -> Vec<Value> {
    let kind = ColumnType::detect(cells.iter().map(|cell| {
        cell.map(|text| {
            if parse_number(text).is_some() {
                ColumnType::Number
            } else if parse_bool(text).is_some() {
                ColumnType::Boolean
            } else {
                ColumnType::Text
            }
        })
    }));
    cells
        .iter()
        .map(|cell| match (cell, kind) {
            (None, _) => Value::Missing,
            (Some(text), ColumnType::Number) => parse_number(text).map(Value::Number).unwrap_or_default(),
            (Some(text), ColumnType::Boolean) => parse_bool(text).map(Value::Bool).unwrap_or_default(),
            (Some(text), _) => Value::Text(text.to_string()),
        })
        .collect()
}

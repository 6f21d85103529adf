//! # Column Inference
//!
//! Finds the event date column and the event name column by ordered name
//! rules, parses the dates (day before month) and derives the group label
//! column. Both steps return new tables; nothing fails, unreadable cells
//! become missing.

pub mod dates;
pub mod label;
pub mod rules;

use crate::inference::rules::first_match;
use crate::inference::rules::DATE_COLUMN_RULES;
use crate::inference::rules::EVENT_NAME_RULES;
use crate::table::Column;
use crate::table::RecordTable;
use tracing::debug;

/// Name of the derived group label column.
pub const GROUP_LABEL_COLUMN: &str = "Circo";

/// Selects the date column and replaces it with its parsed dates.
pub fn infer_date_column(table: &RecordTable) -> (RecordTable, Option<String>) {
    let Some((rule, column)) = first_match(&DATE_COLUMN_RULES, table) else {
        debug!("no date column");
        return (table.clone(), None);
    };
    let values: Vec<_> = column.values.iter().map(dates::to_date).collect();
    let unparsed = column
        .values
        .iter()
        .zip(&values)
        .filter(|(source, parsed)| !source.is_missing() && parsed.is_missing())
        .count();
    debug!(column = column.name, rule, unparsed, "inferred date column");
    let name = column.name.to_owned();
    (table.with_column(Column::new(name.as_str(), values)), Some(name))
}

/// Derives the group label column from the event name column, if any.
pub fn derive_group_label(table: &RecordTable, max_chars: usize) -> (RecordTable, Option<String>) {
    let Some((rule, column)) = first_match(&EVENT_NAME_RULES, table) else {
        debug!("no event name column, group labels skipped");
        return (table.clone(), None);
    };
    debug!(column = column.name, rule, "deriving group labels");
    let values = column
        .values
        .iter()
        .map(|value| label::derive_label(value, max_chars))
        .collect();
    (
        table.with_column(Column::new(GROUP_LABEL_COLUMN, values)),
        Some(GROUP_LABEL_COLUMN.to_owned()),
    )
}

use crate::table::value::Value;
use serde::Serialize;

/// Detected kind of a record table column.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Free text, also the fallback for mixed columns
    Text,
}

/// A named column of values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    /// Column name (trimmed header)
    pub name: String,
    /// Cell values, one per row
    pub values: Vec<Value>,
}

impl ColumnType {
    /// Detects the common type from a collection of candidate types.
    /// Falls back to text if types are inconsistent or empty.
    pub fn detect(types: impl IntoIterator<Item = Option<ColumnType>>) -> ColumnType {
        let types: Vec<ColumnType> = types.into_iter().flatten().collect();
        if types.is_empty() {
            ColumnType::Text
        } else if types.iter().all(|kind| *kind == ColumnType::Boolean) {
            ColumnType::Boolean
        } else if types.iter().all(|kind| *kind == ColumnType::Number) {
            ColumnType::Number
        } else {
            ColumnType::Text
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Numeric view of the column; non-numeric cells read as `None`.
    pub fn numbers(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().map(Value::as_number)
    }

    /// Sum of the numeric cells, skipping missing ones (0 for none).
    pub fn sum(&self) -> f64 {
        self.numbers().flatten().sum()
    }

    /// Mean of the numeric cells, `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        mean(self.numbers().flatten())
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (count, total) = values.fold((0usize, 0f64), |(count, total), value| (count + 1, total + value));
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

//! # Record Table
//!
//! Column-major in-memory table produced by the loaders. Every column has the
//! same number of rows; column order is the header order of the source file.
//! Stages after loading never mutate a table in place, they build new ones.

pub mod column;
pub mod value;

pub use column::Column;
pub use column::ColumnType;
pub use value::Value;

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<Column>,
}

impl RecordTable {
    /// Builds a table from header names and row-major values. Short rows are
    /// padded with missing values, extra cells are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or_default());
            }
        }
        RecordTable { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|column| column.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// First column with exactly this name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// First column whose lower-cased name equals `name`.
    pub fn column_ci(&self, name: &str) -> Option<&Column> {
        let name = name.to_lowercase();
        self.columns.iter().find(|column| column.name.to_lowercase() == name)
    }

    /// Numeric view of a column: `None` for each non-number cell.
    pub fn numeric(&self, name: &str) -> Option<impl Iterator<Item = Option<f64>> + '_> {
        self.column(name).map(|column| column.numbers())
    }

    /// Returns a table with `column` replacing the first column of the same
    /// name, or appended when no such column exists.
    pub fn with_column(&self, column: Column) -> RecordTable {
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|existing| existing.name == column.name) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        RecordTable { columns }
    }

    /// Keeps the rows whose mask entry is `true`, in their original order.
    pub fn select_rows(&self, mask: &[bool]) -> RecordTable {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                values: column
                    .values
                    .iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value.clone())
                    .collect(),
            })
            .collect();
        RecordTable { columns }
    }

    /// Values of one row, in column order.
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().filter_map(|column| column.values.get(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RecordTable {
        RecordTable::from_rows(
            vec!["Evento".to_owned(), "Faturamento Total".to_owned()],
            vec![
                vec![Value::Text("A".to_owned()), Value::Number(1.0)],
                vec![Value::Text("B".to_owned())],
                vec![Value::Text("C".to_owned()), Value::Number(3.0), Value::Number(9.0)],
            ],
        )
    }

    #[test]
    fn from_rows_pads_and_truncates() {
        let table = table();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row(1), vec![&Value::Text("B".to_owned()), &Value::Missing]);
        assert_eq!(table.row(2)[1], &Value::Number(3.0));
    }

    #[test]
    fn lookups() {
        let table = table();
        assert!(table.column("evento").is_none());
        assert_eq!(table.column_ci("EVENTO").map(|column| column.name.as_str()), Some("Evento"));
        assert!(table.numeric("Nada").is_none());
    }

    #[test]
    fn with_column_replaces_or_appends() {
        let table = table();
        let replaced = table.with_column(Column::new("Evento", vec![Value::Missing; 3]));
        assert_eq!(replaced.columns.len(), 2);
        assert!(replaced.columns[0].values.iter().all(Value::is_missing));

        let appended = table.with_column(Column::new("Circo", vec![Value::Missing; 3]));
        assert_eq!(appended.column_names().collect::<Vec<_>>(), vec!["Evento", "Faturamento Total", "Circo"]);
        // source table untouched
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn select_rows_preserves_order() {
        let selected = table().select_rows(&[true, false, true]);
        assert_eq!(selected.row_count(), 2);
        assert_eq!(selected.columns[0].values, vec![Value::Text("A".to_owned()), Value::Text("C".to_owned())]);

        let none = table().select_rows(&[false, false, false]);
        assert!(none.is_empty());
        assert_eq!(none.columns.len(), 2);
    }
}

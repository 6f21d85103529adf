use crate::coercion::ensure_numeric;
use crate::inference::derive_group_label;
use crate::inference::infer_date_column;
use crate::table::Column;
use crate::table::RecordTable;
use serde::Serialize;

/// A loaded table after inference and coercion, with the roles of its columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    pub table: RecordTable,
    /// Parsed event date column
    pub date_column: Option<String>,
    /// Derived group label column
    pub label_column: Option<String>,
}

impl Dataset {
    /// Runs inference then coercion over a freshly loaded table.
    pub fn prepare(table: &RecordTable, label_max_chars: usize) -> Dataset {
        let (table, date_column) = infer_date_column(table);
        let (table, label_column) = derive_group_label(&table, label_max_chars);
        let table = ensure_numeric(&table);
        Dataset {
            table,
            date_column,
            label_column,
        }
    }

    /// Same roles over another table, such as a filtered one.
    pub fn with_table(&self, table: RecordTable) -> Dataset {
        Dataset {
            table,
            date_column: self.date_column.clone(),
            label_column: self.label_column.clone(),
        }
    }

    pub fn date_column(&self) -> Option<&Column> {
        self.date_column.as_deref().and_then(|name| self.table.column(name))
    }

    pub fn label_column(&self) -> Option<&Column> {
        self.label_column.as_deref().and_then(|name| self.table.column(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn prepares_roles_and_numbers() {
        let table = RecordTable::from_rows(
            vec!["Evento".to_owned(), "Data".to_owned(), "Faturamento Total".to_owned()],
            vec![vec![
                Value::Text("Circo A | SP".to_owned()),
                Value::Text("02/01/2023".to_owned()),
                Value::Text("100".to_owned()),
            ]],
        );
        let dataset = Dataset::prepare(&table, 60);
        assert_eq!(dataset.date_column.as_deref(), Some("Data"));
        assert_eq!(dataset.label_column.as_deref(), Some("Circo"));
        assert!(dataset.date_column().unwrap().values[0].as_date().is_some());
        assert_eq!(dataset.label_column().unwrap().values[0], Value::Text("Circo A".to_owned()));
        assert_eq!(dataset.table.column("Faturamento Total").unwrap().values[0], Value::Number(100.0));

        let empty = dataset.with_table(dataset.table.select_rows(&[false]));
        assert!(empty.table.is_empty());
        assert_eq!(empty.date_column, dataset.date_column);
    }
}

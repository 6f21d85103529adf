use crate::spreadsheet::cell::Cell;
use crate::table::RecordTable;
use crate::table::Value;
use std::collections::HashSet;

/// Cells of one worksheet, in document order.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, widening the column range.
    pub(super) fn push(&mut self, cell: Cell) {
        if self.col_lower_bound.map(|lower| cell.col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(cell.col);
        }
        if self.col_upper_bound.map(|upper| upper < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.cells.push(cell);
    }

    /// Builds a record table: the first row holding any value is the header,
    /// later rows without values are skipped. Header names are kept verbatim;
    /// normalization happens in the loader.
    pub(crate) fn to_table(&self, shared_strings: &[String], nulls: &HashSet<String>) -> RecordTable {
        let (Some(col_lower), Some(col_upper)) = (self.col_lower_bound, self.col_upper_bound) else {
            return RecordTable::default();
        };
        let width = col_upper - col_lower + 1;

        let mut cells: Vec<&Cell> = self.cells.iter().collect();
        cells.sort_by_key(|cell| (cell.row, cell.col));

        let mut records = Vec::<Vec<Value>>::new();
        let mut current_row = None::<usize>;
        for cell in cells {
            let value = match cell.to_value(shared_strings) {
                Value::Text(text) if nulls.contains(&text) => Value::Missing,
                value => value,
            };
            if current_row != Some(cell.row) {
                current_row = Some(cell.row);
                records.push(vec![Value::Missing; width]);
            }
            if let Some(record) = records.last_mut() {
                record[cell.col - col_lower] = value;
            }
        }
        records.retain(|record| record.iter().any(|value| !value.is_missing()));

        let mut records = records.into_iter();
        let Some(header) = records.next() else {
            return RecordTable::default();
        };
        let headers = header.iter().map(|value| value.to_string()).collect();
        RecordTable::from_rows(headers, records.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    fn push(sheet: &mut Sheet, row: usize, col: usize, kind: CellType, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_bounds() {
        let mut sheet = Sheet::new("Plan1");
        assert!(sheet.is_empty());
        push(&mut sheet, 1, 3, CellType::InlineString, "b");
        push(&mut sheet, 1, 1, CellType::InlineString, "a");
        assert_eq!(sheet.col_lower_bound, Some(1));
        assert_eq!(sheet.col_upper_bound, Some(3));
    }

    #[test]
    fn first_row_with_values_is_header() {
        let shared = vec!["Evento".to_owned(), "Faturamento Total".to_owned()];
        let mut sheet = Sheet::new("Plan1");
        push(&mut sheet, 2, 1, CellType::SharedString, "0");
        push(&mut sheet, 2, 2, CellType::SharedString, "1");
        push(&mut sheet, 3, 1, CellType::InlineString, "Circo A");
        push(&mut sheet, 3, 2, CellType::Number, "100");
        push(&mut sheet, 4, 1, CellType::InlineString, "NA");
        push(&mut sheet, 6, 2, CellType::Number, "50");

        let nulls = HashSet::from(["NA".to_owned()]);
        let table = sheet.to_table(&shared, &nulls);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Evento", "Faturamento Total"]);
        // row 4 only held a null literal
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].values, vec![Value::Number(100.0), Value::Number(50.0)]);
        assert_eq!(table.columns[0].values, vec![Value::Text("Circo A".to_owned()), Value::Missing]);
    }

    #[test]
    fn empty_sheet_has_no_columns() {
        let table = Sheet::new("Plan1").to_table(&[], &HashSet::new());
        assert!(table.columns.is_empty());
    }
}

//! Numeric coercion of the monetary columns.

use crate::table::value::parse_number;
use crate::table::Column;
use crate::table::RecordTable;
use crate::table::Value;
use tracing::debug;

pub const FATURAMENTO_TOTAL: &str = "Faturamento Total";
pub const FATURAMENTO_PDV: &str = "Faturamento Pdv";
pub const FATURAMENTO_WEB: &str = "Faturamento Web";
pub const TOTAL_DESCONTOS: &str = "Total Descontos";
pub const TAXA_ANTECIPACAO: &str = "Taxa Antecipação";

/// Columns read as money, matched by exact name.
pub const MONEY_COLUMNS: [&str; 16] = [
    FATURAMENTO_TOTAL,
    "Faturamento Gestão Produtor",
    "Faturamento Gestão Empresa",
    FATURAMENTO_PDV,
    FATURAMENTO_WEB,
    "Total Repasses",
    TOTAL_DESCONTOS,
    TAXA_ANTECIPACAO,
    "Taxa Transferencia",
    "I:Comissão Bilheteria e PDVS",
    "I:Insumo - Ingresso Cancelado",
    "I:Insumo - Ingresso Cortesia",
    "I:Taxas Cartões - Debito",
    "I:Taxas Cartões - Credito à Vista",
    "I:Taxa Pix",
    "I:Despesas Jurídicas",
];

/// Numeric reading of a cell; anything that is not a number becomes missing.
pub fn to_number(value: &Value) -> Value {
    match value {
        Value::Number(number) => Value::Number(*number),
        Value::Bool(flag) => Value::Number(if *flag { 1.0 } else { 0.0 }),
        Value::Text(text) => parse_number(text).map(Value::Number).unwrap_or_default(),
        Value::Missing | Value::Date(_) => Value::Missing,
    }
}

/// Converts every present monetary column to numbers. Absent columns are skipped.
pub fn ensure_numeric(table: &RecordTable) -> RecordTable {
    let mut table = table.clone();
    for name in MONEY_COLUMNS {
        if let Some(column) = table.column(name) {
            let values = column.values.iter().map(to_number).collect();
            table = table.with_column(Column::new(name, values));
            debug!(column = name, "coerced to numbers");
        }
    }
    table
}

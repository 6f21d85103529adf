use crate::coercion::FATURAMENTO_PDV;
use crate::coercion::FATURAMENTO_TOTAL;
use crate::coercion::FATURAMENTO_WEB;
use crate::dataset::Dataset;
use serde::Serialize;

/// Headline metrics of the filtered rows. Sums are `None` when the column is absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total: Option<f64>,
    pub pdv: Option<f64>,
    pub web: Option<f64>,
    pub event_count: usize,
}

impl Kpis {
    pub fn compute(dataset: &Dataset) -> Kpis {
        let sum = |name: &str| dataset.table.column(name).map(|column| column.sum());
        Kpis {
            total: sum(FATURAMENTO_TOTAL),
            pdv: sum(FATURAMENTO_PDV),
            web: sum(FATURAMENTO_WEB),
            event_count: dataset.table.row_count(),
        }
    }

    /// Display label and formatted value of each metric card.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Faturamento Total", format_brl(self.total)),
            ("PDV (soma)", format_brl(self.pdv)),
            ("Web (soma)", format_brl(self.web)),
            ("Qtd. de Eventos", self.event_count.to_string()),
        ]
    }
}

/// Formats an amount as Brazilian reais without cents: `R$ 12.345`.
/// Absent or non-finite amounts read `R$ 0`.
pub fn format_brl(value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return "R$ 0".to_owned();
    };
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("R$ {sign}{grouped}")
}

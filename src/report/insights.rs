use crate::coercion::FATURAMENTO_PDV;
use crate::coercion::FATURAMENTO_TOTAL;
use crate::coercion::FATURAMENTO_WEB;
use crate::coercion::TAXA_ANTECIPACAO;
use crate::coercion::TOTAL_DESCONTOS;
use crate::dataset::Dataset;
use crate::report::charts::DateTotals;
use crate::report::kpi::format_brl;
use crate::table::column::mean;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

/// Shown when no insight applies to the filtered rows.
pub const NO_INSIGHTS: &str = "Sem insights calculáveis para as colunas disponíveis.";

/// An automatic observation about the filtered rows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    BestDay { date: NaiveDate, total: f64 },
    AverageRevenue { mean: f64 },
    WebShare { percent: f64 },
    AverageAdvanceFee { mean: f64 },
    TotalDiscounts { total: f64 },
}

impl Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insight::BestDay { date, total } => write!(
                f,
                "Melhor dia de faturamento: {} com {}.",
                date.format("%Y-%m-%d"),
                format_brl(Some(*total))
            ),
            Insight::AverageRevenue { mean } => {
                write!(f, "Faturamento médio por evento: {}.", format_brl(Some(*mean)))
            }
            Insight::WebShare { percent } => {
                write!(f, "Participação Web: {percent:.1}% do faturamento (restante PDV).")
            }
            Insight::AverageAdvanceFee { mean } => {
                write!(f, "Taxa de antecipação média (onde aplicada): {mean:.2}.")
            }
            Insight::TotalDiscounts { total } => {
                write!(f, "Descontos totais no período filtrado: {}.", format_brl(Some(*total)))
            }
        }
    }
}

/// Computes the insights whose columns and values allow it, in display order.
pub fn insights(dataset: &Dataset, groups: &[DateTotals]) -> Vec<Insight> {
    let table = &dataset.table;
    let mut insights = Vec::new();

    if let Some(best) = best_day(groups) {
        insights.push(best);
    }

    if let Some(mean) = table.column(FATURAMENTO_TOTAL).and_then(|column| column.mean()) {
        insights.push(Insight::AverageRevenue { mean });
    }

    if let (Some(pdv), Some(web)) = (table.column(FATURAMENTO_PDV), table.column(FATURAMENTO_WEB)) {
        let web = web.sum();
        let combined = pdv.sum() + web;
        if combined > 0.0 {
            insights.push(Insight::WebShare {
                percent: web / combined * 100.0,
            });
        }
    }

    if let Some(fees) = table.column(TAXA_ANTECIPACAO) {
        if let Some(mean) = mean(fees.numbers().flatten().filter(|fee| *fee != 0.0)) {
            insights.push(Insight::AverageAdvanceFee { mean });
        }
    }

    if let Some(discounts) = table.column(TOTAL_DESCONTOS) {
        let total = discounts.sum();
        if total > 0.0 {
            insights.push(Insight::TotalDiscounts { total });
        }
    }

    insights
}

/// Day with the highest summed total; the earliest one on ties.
fn best_day(groups: &[DateTotals]) -> Option<Insight> {
    let mut best = None::<(NaiveDate, f64)>;
    for group in groups {
        let Some(total) = group.total else {
            continue;
        };
        if best.map(|(_, highest)| total > highest).unwrap_or(true) {
            best = Some((group.date.date(), total));
        }
    }
    best.map(|(date, total)| Insight::BestDay { date, total })
}

//! # Aggregation
//!
//! Pure functions over a filtered dataset: headline metrics, up to four
//! charts and the automatic insights. Every chart and insight depends on
//! specific columns and is skipped when they are absent.

pub mod charts;
pub mod insights;
pub mod kpi;

use crate::dataset::Dataset;
use crate::report::charts::Chart;
use crate::report::insights::Insight;
use crate::report::kpi::Kpis;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub kpis: Kpis,
    pub charts: Vec<Chart>,
    pub insights: Vec<Insight>,
}

/// Builds the report of the filtered rows; `top_events` bounds the ranking.
pub fn build_report(dataset: &Dataset, top_events: usize) -> Report {
    let groups = charts::group_by_date(dataset);
    let charts: Vec<Chart> = [
        charts::revenue_by_date(&groups),
        charts::revenue_by_channel_over_time(&groups),
        charts::top_events(dataset, top_events),
        charts::channel_share(dataset),
    ]
    .into_iter()
    .flatten()
    .collect();
    let insights = insights::insights(dataset, &groups);
    debug!(charts = charts.len(), insights = insights.len(), "built report");
    Report {
        kpis: Kpis::compute(dataset),
        charts,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecordTable;
    use crate::table::Value;

    #[test]
    fn columns_decide_what_is_shown() {
        let table = RecordTable::from_rows(
            vec!["Evento".to_owned(), "Faturamento Total".to_owned()],
            vec![vec![Value::Text("Circo A".to_owned()), Value::Number(12345.0)]],
        );
        let dataset = Dataset {
            table,
            date_column: None,
            label_column: None,
        };
        let report = build_report(&dataset, 15);
        assert_eq!(report.kpis.total, Some(12345.0));
        let titles: Vec<_> = report.charts.iter().map(|chart| chart.title.as_str()).collect();
        assert_eq!(titles, vec!["Top 15 Eventos por Faturamento"]);
        assert_eq!(report.insights.len(), 1);
    }

    #[test]
    fn empty_table_reports_zero() {
        let dataset = Dataset {
            table: RecordTable::default(),
            date_column: None,
            label_column: None,
        };
        let report = build_report(&dataset, 15);
        assert_eq!(report.kpis.event_count, 0);
        assert!(report.charts.is_empty());
        assert!(report.insights.is_empty());
    }
}

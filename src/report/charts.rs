use crate::coercion::FATURAMENTO_PDV;
use crate::coercion::FATURAMENTO_TOTAL;
use crate::coercion::FATURAMENTO_WEB;
use crate::dataset::Dataset;
use crate::table::value::format_datetime;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Column ranked by revenue, matched ignoring case
const EVENT_COLUMN: &str = "evento";

/// Revenue columns summed per event day
const REVENUE_COLUMNS: [&str; 3] = [FATURAMENTO_TOTAL, FATURAMENTO_PDV, FATURAMENTO_WEB];

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    StackedBar,
    HorizontalBar,
    Pie,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<Series>,
}

/// Revenue sums of one event date. A sum is `None` when its column is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct DateTotals {
    pub date: NaiveDateTime,
    pub total: Option<f64>,
    pub pdv: Option<f64>,
    pub web: Option<f64>,
}

/// Groups rows by their date, ascending. Undated rows are left out; missing
/// amounts count as zero.
pub fn group_by_date(dataset: &Dataset) -> Vec<DateTotals> {
    let Some(dates) = dataset.date_column() else {
        return Vec::new();
    };
    let columns = REVENUE_COLUMNS.map(|name| dataset.table.column(name));
    let mut groups = BTreeMap::<NaiveDateTime, [f64; 3]>::new();
    for (row, value) in dates.values.iter().enumerate() {
        let Some(date) = value.as_date() else {
            continue;
        };
        let sums = groups.entry(date).or_default();
        for (sum, column) in sums.iter_mut().zip(&columns) {
            *sum += column
                .and_then(|column| column.values.get(row))
                .and_then(|value| value.as_number())
                .unwrap_or(0.0);
        }
    }
    let present = columns.map(|column| column.is_some());
    groups
        .into_iter()
        .map(|(date, [total, pdv, web])| DateTotals {
            date,
            total: Some(total).filter(|_| present[0]),
            pdv: Some(pdv).filter(|_| present[1]),
            web: Some(web).filter(|_| present[2]),
        })
        .collect()
}

/// "Faturamento Total por Data"
pub fn revenue_by_date(groups: &[DateTotals]) -> Option<Chart> {
    let points = groups
        .iter()
        .map(|group| {
            group.total.map(|total| Point {
                label: format_datetime(&group.date),
                value: total,
            })
        })
        .collect::<Option<Vec<_>>>()
        .filter(|points| !points.is_empty())?;
    Some(Chart {
        kind: ChartKind::Line,
        title: "Faturamento Total por Data".to_owned(),
        series: vec![Series {
            name: FATURAMENTO_TOTAL.to_owned(),
            points,
        }],
    })
}

/// "Faturamento por Canal ao Longo do Tempo", PDV stacked under Web
pub fn revenue_by_channel_over_time(groups: &[DateTotals]) -> Option<Chart> {
    let first = groups.first()?;
    if first.pdv.is_none() || first.web.is_none() {
        return None;
    }
    let series = |name: &str, amount: fn(&DateTotals) -> Option<f64>| Series {
        name: name.to_owned(),
        points: groups
            .iter()
            .map(|group| Point {
                label: format_datetime(&group.date),
                value: amount(group).unwrap_or(0.0),
            })
            .collect(),
    };
    Some(Chart {
        kind: ChartKind::StackedBar,
        title: "Faturamento por Canal ao Longo do Tempo".to_owned(),
        series: vec![
            series(FATURAMENTO_PDV, |group| group.pdv),
            series(FATURAMENTO_WEB, |group| group.web),
        ],
    })
}

/// Events ranked by summed total revenue, highest first, at most `limit`.
/// Equal sums keep event name order.
pub fn top_events(dataset: &Dataset, limit: usize) -> Option<Chart> {
    let events = dataset.table.column_ci(EVENT_COLUMN)?;
    let totals = dataset.table.numeric(FATURAMENTO_TOTAL)?;

    let mut sums = BTreeMap::<String, f64>::new();
    for (event, total) in events.values.iter().zip(totals) {
        if let Some(event) = event.to_text() {
            *sums.entry(event).or_default() += total.unwrap_or(0.0);
        }
    }
    let mut ranking: Vec<(String, f64)> = sums.into_iter().collect();
    ranking.sort_by(|(_, left), (_, right)| right.total_cmp(left));
    ranking.truncate(limit);

    Some(Chart {
        kind: ChartKind::HorizontalBar,
        title: format!("Top {limit} Eventos por Faturamento"),
        series: vec![Series {
            name: FATURAMENTO_TOTAL.to_owned(),
            points: ranking
                .into_iter()
                .map(|(label, value)| Point { label, value })
                .collect(),
        }],
    })
}

/// "Participação por Canal": PDV and Web sums as two slices
pub fn channel_share(dataset: &Dataset) -> Option<Chart> {
    let pdv = dataset.table.column(FATURAMENTO_PDV)?;
    let web = dataset.table.column(FATURAMENTO_WEB)?;
    Some(Chart {
        kind: ChartKind::Pie,
        title: "Participação por Canal".to_owned(),
        series: vec![Series {
            name: "Canal".to_owned(),
            points: vec![
                Point {
                    label: "PDV".to_owned(),
                    value: pdv.sum(),
                },
                Point {
                    label: "Web".to_owned(),
                    value: web.sum(),
                },
            ],
        }],
    })
}

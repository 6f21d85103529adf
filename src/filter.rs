//! # Filter Engine
//!
//! Restricts a prepared dataset to an inclusive date interval and a set of
//! group labels. Both endpoints are taken at midnight, so events later on
//! the end day fall outside the interval; rows whose date or label is
//! missing fail an active condition. Row order is preserved.

use crate::dataset::Dataset;
use chrono::NaiveDate;
use chrono::NaiveTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashSet;
use tracing::debug;

/// The user's current choice. Transient: rebuilt on every interaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub labels: Vec<String>,
}

/// What the user asked for. Unset parts fall back to the page defaults; an
/// empty label list turns the label filter off.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub labels: Option<Vec<String>>,
}

/// What the page offers for a dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterControls {
    /// Observed first and last event day
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Sorted distinct labels
    pub label_options: Vec<String>,
    /// Labels preselected when the user has not chosen any
    pub default_labels: Vec<String>,
}

impl FilterControls {
    pub fn for_dataset(dataset: &Dataset, default_label_count: usize) -> FilterControls {
        let dates = dataset
            .date_column()
            .map(|column| column.values.iter().filter_map(|value| value.as_date()).map(|date| date.date()))
            .into_iter()
            .flatten();
        let date_bounds = dates.fold(None, |bounds: Option<(NaiveDate, NaiveDate)>, date| match bounds {
            None => Some((date, date)),
            Some((lower, upper)) => Some((lower.min(date), upper.max(date))),
        });

        let label_options: Vec<String> = dataset
            .label_column()
            .map(|column| column.values.iter().filter_map(|value| value.to_text()).collect::<BTreeSet<_>>())
            .unwrap_or_default()
            .into_iter()
            .collect();
        let default_labels = label_options.iter().take(default_label_count).cloned().collect();

        FilterControls {
            date_bounds,
            label_options,
            default_labels,
        }
    }

    /// The selection used when the user has not picked one: the full date
    /// range and the default labels.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            start: self.date_bounds.map(|(lower, _)| lower),
            end: self.date_bounds.map(|(_, upper)| upper),
            labels: self.default_labels.clone(),
        }
    }

    /// Completes a request with the defaults of these controls.
    pub fn resolve(&self, request: &SelectionRequest) -> FilterSelection {
        let defaults = self.default_selection();
        FilterSelection {
            start: request.start.or(defaults.start),
            end: request.end.or(defaults.end),
            labels: request.labels.clone().unwrap_or(defaults.labels),
        }
    }
}

/// Applies the selection, returning the matching rows in their original order.
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    let mut mask = vec![true; dataset.table.row_count()];

    if let (Some(column), Some(start), Some(end)) = (dataset.date_column(), selection.start, selection.end) {
        let (start, end) = (start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
        for (keep, value) in mask.iter_mut().zip(&column.values) {
            *keep &= value
                .as_date()
                .map(|date| start <= date && date <= end)
                .unwrap_or(false);
        }
    }

    if let Some(column) = dataset.label_column().filter(|_| !selection.labels.is_empty()) {
        let labels: HashSet<&str> = selection.labels.iter().map(String::as_str).collect();
        for (keep, value) in mask.iter_mut().zip(&column.values) {
            *keep &= value.to_text().map(|label| labels.contains(label.as_str())).unwrap_or(false);
        }
    }

    let filtered = dataset.with_table(dataset.table.select_rows(&mask));
    debug!(
        rows = dataset.table.row_count(),
        kept = filtered.table.row_count(),
        labels = selection.labels.len(),
        "applied filters"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecordTable;
    use crate::table::Value;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, month, day).unwrap()
    }

    fn dataset() -> Dataset {
        let row = |label: Option<&str>, date: Option<(u32, u32, u32)>, total: f64| {
            vec![
                label.map(|label| Value::Text(label.to_owned())).unwrap_or_default(),
                date.map(|(month, d, hour)| Value::Date(day(month, d).and_hms_opt(hour, 0, 0).unwrap()))
                    .unwrap_or_default(),
                Value::Number(total),
            ]
        };
        let table = RecordTable::from_rows(
            vec!["Circo".to_owned(), "Data Evento".to_owned(), "Faturamento Total".to_owned()],
            vec![
                row(Some("Circo B"), Some((2, 1, 0)), 10.0),
                row(Some("Circo A"), Some((2, 3, 20)), 20.0),
                row(None, Some((2, 2, 0)), 30.0),
                row(Some("Circo C"), None, 40.0),
                row(Some("Circo A"), Some((2, 10, 0)), 50.0),
            ],
        );
        Dataset {
            table,
            date_column: Some("Data Evento".to_owned()),
            label_column: Some("Circo".to_owned()),
        }
    }

    fn totals(dataset: &Dataset) -> Vec<f64> {
        dataset.table.column("Faturamento Total").unwrap().numbers().flatten().collect()
    }

    #[test]
    fn controls() {
        let controls = FilterControls::for_dataset(&dataset(), 2);
        assert_eq!(controls.date_bounds, Some((day(2, 1), day(2, 10))));
        assert_eq!(controls.label_options, vec!["Circo A", "Circo B", "Circo C"]);
        assert_eq!(controls.default_labels, vec!["Circo A", "Circo B"]);
        let selection = controls.default_selection();
        assert_eq!(selection.start, Some(day(2, 1)));
        assert_eq!(selection.end, Some(day(2, 10)));
    }

    #[test]
    fn requests_fall_back_to_defaults() {
        let controls = FilterControls::for_dataset(&dataset(), 1);
        let request = SelectionRequest {
            end: Some(day(2, 4)),
            ..SelectionRequest::default()
        };
        let selection = controls.resolve(&request);
        assert_eq!(selection.start, Some(day(2, 1)));
        assert_eq!(selection.end, Some(day(2, 4)));
        assert_eq!(selection.labels, vec!["Circo A"]);
        assert_eq!(totals(&apply(&dataset(), &selection)), vec![20.0]);

        let all_labels = SelectionRequest {
            labels: Some(vec![]),
            ..SelectionRequest::default()
        };
        assert!(controls.resolve(&all_labels).labels.is_empty());
    }

    #[test]
    fn no_active_filter_keeps_everything() {
        let filtered = apply(&dataset(), &FilterSelection::default());
        assert_eq!(totals(&filtered), vec![10.0, 20.0, 30.0, 40.0, 50.0]);

        // a single endpoint does not filter
        let selection = FilterSelection {
            start: Some(day(2, 2)),
            ..FilterSelection::default()
        };
        assert_eq!(apply(&dataset(), &selection).table.row_count(), 5);
    }

    #[test]
    fn date_interval_ends_at_midnight() {
        let selection = FilterSelection {
            start: Some(day(2, 1)),
            end: Some(day(2, 3)),
            labels: vec![],
        };
        // the 20:00 event on the end day and the undated row are dropped
        assert_eq!(totals(&apply(&dataset(), &selection)), vec![10.0, 30.0]);

        let next_day = FilterSelection {
            end: Some(day(2, 4)),
            ..selection
        };
        assert_eq!(totals(&apply(&dataset(), &next_day)), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn labels_and_dates_combine() {
        let selection = FilterSelection {
            start: Some(day(2, 1)),
            end: Some(day(2, 28)),
            labels: vec!["Circo A".to_owned(), "Circo C".to_owned()],
        };
        assert_eq!(totals(&apply(&dataset(), &selection)), vec![20.0, 50.0]);
    }

    #[test]
    fn unknown_labels_leave_no_rows() {
        let selection = FilterSelection {
            labels: vec!["Circo Z".to_owned()],
            ..FilterSelection::default()
        };
        let filtered = apply(&dataset(), &selection);
        assert!(filtered.table.is_empty());
        assert_eq!(filtered.table.columns.len(), 3);
    }

    #[test]
    fn without_roles_nothing_is_filtered() {
        let mut dataset = dataset();
        dataset.date_column = None;
        dataset.label_column = None;
        let selection = FilterSelection {
            start: Some(day(3, 1)),
            end: Some(day(3, 2)),
            labels: vec!["Circo Z".to_owned()],
        };
        assert_eq!(apply(&dataset, &selection).table.row_count(), 5);
    }
}

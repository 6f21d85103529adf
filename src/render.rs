//! Plain-text and JSON renditions of a dashboard view.

use crate::dashboard::DashboardPage;
use crate::dashboard::DashboardView;
use crate::error::DashboardError;
use crate::report::charts::Chart;
use crate::report::charts::ChartKind;
use crate::report::insights::NO_INSIGHTS;
use crate::report::kpi::format_brl;
use std::fmt::Display;
use std::fmt::Formatter;

pub const TITLE: &str = "Dash Circos";

/// Characters of the longest bar
const BAR_WIDTH: usize = 40;

/// Fill characters of stacked series, bottom first
const STACK_FILLS: [char; 2] = ['#', '='];

/// The page as terminal text.
pub struct TextPage<'a> {
    view: &'a DashboardView,
    preview_rows: usize,
}

impl<'a> TextPage<'a> {
    pub fn new(view: &'a DashboardView, preview_rows: usize) -> Self {
        TextPage { view, preview_rows }
    }
}

impl Display for TextPage<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;
        writeln!(f)?;
        match self.view {
            DashboardView::AwaitingInput { message } => writeln!(f, "{message}"),
            DashboardView::Ready(page) => write_page(f, page, self.preview_rows),
        }
    }
}

/// The whole view as pretty-printed JSON.
pub fn to_json(view: &DashboardView) -> Result<String, DashboardError> {
    Ok(serde_json::to_string_pretty(view)?)
}

fn write_page(f: &mut Formatter<'_>, page: &DashboardPage, preview_rows: usize) -> std::fmt::Result {
    writeln!(f, "Arquivo: {}", page.file_name)?;
    if let (Some(start), Some(end)) = (page.selection.start, page.selection.end) {
        writeln!(f, "Período: {} a {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))?;
    }
    if !page.controls.label_options.is_empty() {
        if page.selection.labels.is_empty() {
            writeln!(f, "Circos: todos")?;
        } else {
            writeln!(f, "Circos: {}", page.selection.labels.join(", "))?;
        }
    }

    writeln!(f)?;
    for (label, value) in page.report.kpis.cards() {
        writeln!(f, "{label}: {value}")?;
    }

    for chart in &page.report.charts {
        writeln!(f)?;
        writeln!(f, "## {}", chart.title)?;
        match chart.kind {
            ChartKind::Line | ChartKind::HorizontalBar => write_bars(f, chart)?,
            ChartKind::StackedBar => write_stacked(f, chart)?,
            ChartKind::Pie => write_shares(f, chart)?,
        }
    }

    writeln!(f)?;
    writeln!(f, "## Dados filtrados ({} linhas)", page.table.row_count())?;
    writeln!(f, "{}", page.table.column_names().collect::<Vec<_>>().join(" | "))?;
    for row in 0..page.table.row_count().min(preview_rows) {
        let cells: Vec<String> = page.table.row(row).iter().map(|value| value.to_string()).collect();
        writeln!(f, "{}", cells.join(" | "))?;
    }
    if page.table.row_count() > preview_rows {
        writeln!(f, "... mais {} linhas", page.table.row_count() - preview_rows)?;
    }

    writeln!(f)?;
    writeln!(f, "## Insights")?;
    if page.report.insights.is_empty() {
        writeln!(f, "{NO_INSIGHTS}")?;
    }
    for insight in &page.report.insights {
        writeln!(f, "- {insight}")?;
    }

    writeln!(f)?;
    writeln!(
        f,
        "Download: {} ({}, {} bytes)",
        page.download.file_name,
        page.download.mime_type,
        page.download.bytes.len()
    )
}

fn write_bars(f: &mut Formatter<'_>, chart: &Chart) -> std::fmt::Result {
    let Some(series) = chart.series.first() else {
        return Ok(());
    };
    let width = label_width(chart);
    let max = series.points.iter().map(|point| point.value).fold(0.0, f64::max);
    for point in &series.points {
        writeln!(
            f,
            "{:<width$} {:<BAR_WIDTH$} {}",
            point.label,
            bar(point.value, max, STACK_FILLS[0]),
            format_brl(Some(point.value))
        )?;
    }
    Ok(())
}

fn write_stacked(f: &mut Formatter<'_>, chart: &Chart) -> std::fmt::Result {
    let Some(first) = chart.series.first() else {
        return Ok(());
    };
    let width = label_width(chart);
    let stack = |index: usize| chart.series.iter().filter_map(move |series| series.points.get(index));
    let max = (0..first.points.len())
        .map(|index| stack(index).map(|point| point.value.max(0.0)).sum::<f64>())
        .fold(0.0, f64::max);
    for (index, point) in first.points.iter().enumerate() {
        let bars: String = stack(index)
            .zip(STACK_FILLS.iter().cycle())
            .map(|(point, fill)| bar(point.value, max, *fill))
            .collect();
        let amounts: Vec<String> = chart
            .series
            .iter()
            .zip(stack(index))
            .map(|(series, point)| format!("{} {}", series.name, format_brl(Some(point.value))))
            .collect();
        writeln!(f, "{:<width$} {:<BAR_WIDTH$} {}", point.label, bars, amounts.join(" | "))?;
    }
    Ok(())
}

fn write_shares(f: &mut Formatter<'_>, chart: &Chart) -> std::fmt::Result {
    let Some(series) = chart.series.first() else {
        return Ok(());
    };
    let whole: f64 = series.points.iter().map(|point| point.value).sum();
    for point in &series.points {
        if whole > 0.0 {
            let share = point.value / whole * 100.0;
            writeln!(f, "{}: {} ({share:.1}%)", point.label, format_brl(Some(point.value)))?;
        } else {
            writeln!(f, "{}: {}", point.label, format_brl(Some(point.value)))?;
        }
    }
    Ok(())
}

fn label_width(chart: &Chart) -> usize {
    chart
        .series
        .iter()
        .flat_map(|series| &series.points)
        .map(|point| point.label.chars().count())
        .max()
        .unwrap_or(0)
}

/// Bar scaled against `max`; empty for non-positive values.
fn bar(value: f64, max: f64, fill: char) -> String {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let length = (value / max * BAR_WIDTH as f64).round() as usize;
    fill.to_string().repeat(length.min(BAR_WIDTH))
}

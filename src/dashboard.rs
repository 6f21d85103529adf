//! # Dashboard Session
//!
//! One user's page. Every interaction re-runs the whole pipeline over the
//! cached dataset: controls, selection, filter, report and download.

use crate::cache::ContentCache;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::error::ResultMessage;
use crate::export::CsvDownload;
use crate::filter::apply;
use crate::filter::FilterControls;
use crate::filter::FilterSelection;
use crate::filter::SelectionRequest;
use crate::helpers::reader::UploadedFile;
use crate::loader::criteria::Criteria;
use crate::loader::load_table;
use crate::report::build_report;
use crate::report::Report;
use crate::table::RecordTable;
use serde::Serialize;
use tracing::info;

/// Prompt shown until a file is uploaded.
pub const AWAITING_INPUT: &str = "Envie o arquivo para começar.";

/// Everything shown once a file is loaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardPage {
    pub file_name: String,
    pub controls: FilterControls,
    pub selection: FilterSelection,
    pub report: Report,
    /// The filtered rows as displayed
    pub table: RecordTable,
    pub download: CsvDownload,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    AwaitingInput { message: &'static str },
    Ready(Box<DashboardPage>),
}

pub struct Dashboard {
    config: DashboardConfig,
    criteria: Criteria,
    cache: ContentCache<Dataset>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Dashboard, DashboardError> {
        let criteria = config.criteria()?;
        Ok(Dashboard {
            config,
            criteria,
            cache: ContentCache::new(),
        })
    }

    /// Renders the page for the current upload and selection request.
    pub fn render(
        &mut self,
        upload: Option<&UploadedFile>,
        request: &SelectionRequest,
    ) -> Result<DashboardView, DashboardError> {
        let Some(upload) = upload else {
            self.cache.clear();
            return Ok(DashboardView::AwaitingInput {
                message: AWAITING_INPUT,
            });
        };

        let criteria = &self.criteria;
        let label_max_chars = self.config.label_max_chars;
        let dataset = self
            .cache
            .get_or_try_insert(upload, |upload| {
                let table = load_table(upload, criteria)?;
                let dataset = Dataset::prepare(&table, label_max_chars);
                info!(
                    file = upload.name,
                    rows = dataset.table.row_count(),
                    date_column = dataset.date_column.as_deref(),
                    label_column = dataset.label_column.as_deref(),
                    "prepared dataset"
                );
                Ok::<_, DashboardError>(dataset)
            })
            .with_prefix(&format!("Load file '{}'", upload.name))?;

        let controls = FilterControls::for_dataset(&dataset, self.config.default_label_count);
        let selection = controls.resolve(request);
        let filtered = apply(&dataset, &selection);
        let report = build_report(&filtered, self.config.top_events);
        let download = CsvDownload::new(&filtered.table, &self.config.export_file_name)?;

        Ok(DashboardView::Ready(Box::new(DashboardPage {
            file_name: upload.name.clone(),
            controls,
            selection,
            report,
            table: filtered.table,
            download,
        })))
    }
}

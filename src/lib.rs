//! # Dash Circos
//!
//! Event revenue dashboard. Loads a spreadsheet (`.xlsx`) or delimited text
//! (`.csv`) of event sales, infers the event date and a group label, coerces
//! the money columns and reports on the rows selected by a date interval and
//! a set of labels.
//!
//! ## Pipeline
//!
//! Every stage returns new values; nothing writes back into an earlier stage.
//!
//! - **Loader**: parses the upload into a [`RecordTable`] with trimmed headers
//! - **Inference**: picks the date column and derives the `Circo` label column
//! - **Coercion**: converts the known money columns to numbers
//! - **Filter**: keeps the rows inside the date interval and label selection
//! - **Report**: KPIs, charts and insights over the filtered rows
//! - **Export**: the filtered rows as a CSV download
//!
//! A [`Dashboard`] session runs the whole pipeline on each interaction and
//! caches only the prepared dataset of the current upload.

pub mod cache;
pub mod coercion;
pub mod config;
pub mod dashboard;
pub mod dataset;
mod delimited;
pub mod error;
pub mod export;
pub mod filter;
mod helpers;
pub mod inference;
mod loader;
pub mod render;
pub mod report;
mod spreadsheet;
pub mod table;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use dashboard::DashboardPage;
pub use dashboard::DashboardView;
pub use delimited::DelimitedError;
pub use error::DashboardError;
pub use filter::FilterSelection;
pub use filter::SelectionRequest;
pub use helpers::reader::UploadedFile;
pub use render::TextPage;
pub use spreadsheet::SpreadsheetError;
pub use table::RecordTable;
pub use table::Value;

use crate::error::DashboardError;
use crate::loader::criteria::Criteria;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Serialized;
use figment::providers::Toml;
use figment::Figment;
use serde::Deserialize;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Prefix of the environment variables overriding configuration keys
pub const ENV_PREFIX: &str = "DASH_";

/// Dashboard settings. Layered as defaults, then an optional TOML file,
/// then `DASH_*` environment variables.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Length of the revenue ranking
    pub top_events: usize,
    /// Labels preselected in the label filter
    pub default_label_count: usize,
    /// Characters kept when a label falls back to truncation
    pub label_max_chars: usize,
    /// Glob pattern of the worksheet to read; the first sheet when unset
    pub sheet: Option<String>,
    /// Name of the filtered CSV download
    pub export_file_name: String,
    /// Rows shown in the text table preview
    pub table_preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            top_events: 15,
            default_label_count: 10,
            label_max_chars: 60,
            sheet: None,
            export_file_name: "dados_filtrados.csv".to_owned(),
            table_preview_rows: 20,
        }
    }
}

impl DashboardConfig {
    /// Loads the layered configuration. A file given explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<DashboardConfig, DashboardError> {
        let mut figment = Figment::from(Serialized::defaults(DashboardConfig::default()));
        if let Some(path) = path {
            if !path.is_file() {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Config file '{}' not found", path.display()),
                ))?
            }
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    fn extract(figment: Figment) -> Result<DashboardConfig, DashboardError> {
        Ok(figment.extract()?)
    }

    /// Loader criteria for these settings.
    pub(crate) fn criteria(&self) -> Result<Criteria, DashboardError> {
        Ok(Criteria::with_sheet_pattern(self.sheet.as_deref())?)
    }
}

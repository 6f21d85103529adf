use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use clap::ValueEnum;
use dash_circos::render::to_json;
use dash_circos::Dashboard;
use dash_circos::DashboardConfig;
use dash_circos::DashboardView;
use dash_circos::SelectionRequest;
use dash_circos::TextPage;
use dash_circos::UploadedFile;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain-text page
    Text,
    /// The whole view as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Event revenue dashboard for spreadsheet and CSV sales exports")]
struct Args {
    /// Sales file (.xlsx or .csv); without it the page waits for an upload
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First event day, YYYY-MM-DD
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last event day, YYYY-MM-DD
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Group label to keep; repeat for several
    #[arg(short, long = "label", conflicts_with = "all_labels")]
    labels: Vec<String>,

    /// Keep every group label
    #[arg(long)]
    all_labels: bool,

    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the filtered rows as CSV to this path
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn selection(&self) -> SelectionRequest {
        let labels = if self.all_labels {
            Some(Vec::new())
        } else if self.labels.is_empty() {
            None
        } else {
            Some(self.labels.clone())
        };
        SelectionRequest {
            start: self.start,
            end: self.end,
            labels,
        }
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = DashboardConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let preview_rows = config.table_preview_rows;
    let mut dashboard = Dashboard::new(config).context("Invalid configuration")?;

    let upload = args
        .file
        .as_ref()
        .map(|path| UploadedFile::open(path).with_context(|| format!("Failed to read {}", path.display())))
        .transpose()?;
    let view = dashboard.render(upload.as_ref(), &args.selection())?;

    match args.format {
        OutputFormat::Text => print!("{}", TextPage::new(&view, preview_rows)),
        OutputFormat::Json => println!("{}", to_json(&view)?),
    }

    if let (Some(path), DashboardView::Ready(page)) = (&args.export, &view) {
        fs::write(path, &page.download.bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = page.table.row_count(), "exported filtered rows");
    }
    Ok(())
}

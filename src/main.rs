//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for printing the trip reports of a city and for
//! paging through the filtered trip rows.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::config::DatasetConfig;
use bikeshare_stats::filter::{City, DayFilter, FilterSpec, MonthFilter};
use bikeshare_stats::output::{
    SummaryRecord, append_record, print_pretty, to_json, write_rows, write_text,
};
use bikeshare_stats::table::DEFAULT_PAGE_SIZE;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to dataset paths
    #[arg(long, global = true)]
    datasets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// City to analyze: chicago, new york city or washington
    #[arg(short, long)]
    city: City,

    /// Month from january to june, or all
    #[arg(short, long, default_value = "all")]
    month: MonthFilter,

    /// Day of the week, or all
    #[arg(short, long, default_value = "all")]
    day: DayFilter,
}

impl Selection {
    fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.city, self.month, self.day)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print time, station, duration and user statistics
    Stats {
        #[command(flatten)]
        selection: Selection,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a one-row summary to
        #[arg(short, long)]
        append: Option<String>,
    },
    /// Print one page of the filtered trip rows
    Raw {
        #[command(flatten)]
        selection: Selection,

        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = dataset_config(&cli)?;

    match cli.command {
        Commands::Stats {
            selection,
            format,
            append,
        } => {
            let spec = selection.spec();
            let (_, summary) = bikeshare_stats::run(&config, &spec)
                .with_context(|| format!("Failed to analyze {}", spec.city))?;
            print_pretty(&summary);

            let mut stdout = std::io::stdout().lock();
            match format {
                Format::Text => write_text(&mut stdout, &summary)?,
                Format::Json => writeln!(stdout, "{}", to_json(&summary)?)?,
            }

            if let Some(path) = append {
                append_record(&path, &SummaryRecord::from_summary(&summary))
                    .with_context(|| format!("Failed to append summary to {path}"))?;
                info!(path = %path, "Summary appended");
            }
        }
        Commands::Raw {
            selection,
            page,
            page_size,
        } => {
            let spec = selection.spec();
            let table = bikeshare_stats::load_filtered(&config, &spec)
                .with_context(|| format!("Failed to load {}", spec.city))?;

            let rows = table.page(page, page_size);
            info!(
                page,
                pages = table.page_count(page_size),
                shown = rows.len(),
                total = table.len(),
                "Raw rows"
            );
            let mut stdout = std::io::stdout().lock();
            write_rows(&mut stdout, rows, page.saturating_mul(page_size))?;
        }
    }

    Ok(())
}

/// Builds the dataset config from flags, falling back to the environment.
fn dataset_config(cli: &Cli) -> Result<DatasetConfig> {
    let mut config = match &cli.data_dir {
        Some(dir) => DatasetConfig::new(dir).with_env_overrides()?,
        None => DatasetConfig::from_env()?,
    };
    if let Some(path) = &cli.datasets {
        config = config.with_overrides_file(path)?;
    }
    Ok(config)
}

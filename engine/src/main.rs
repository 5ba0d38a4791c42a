// Report runner: loads the regional dataset and writes every dashboard view as CSV
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use engine::config::DashboardSettings;
use engine::data::report_writer::{
    write_augmented_csv, write_manifest, write_pivot_csv, write_region_detail_csv, CellFormat, ReportManifest,
    MANIFEST_FILENAME,
};
use engine::periods::{FiscalYear, PeriodSelection};
use engine::services::{DashboardContext, DashboardService};
use shared::models::{Metric, Region};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const GROWTH_METRICS: [Metric; 2] = [Metric::Revenue, Metric::Profit];

#[derive(Parser, Debug)]
#[command(name = "engine")]
#[command(about = "Quarterly revenue and operating profit report by region")]
struct Args {
    /// JSON settings file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output directory for generated CSV reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Show the most recent N quarters
    #[arg(long, conflicts_with = "years")]
    recent: Option<usize>,

    /// Show whole fiscal years instead (e.g. FY2023,FY2024)
    #[arg(long, value_delimiter = ',')]
    years: Vec<String>,

    /// Show the latest fiscal years (count taken from the settings)
    #[arg(long, conflicts_with_all = ["recent", "years"])]
    by_year: bool,

    /// Region for the detail report (English or local name)
    #[arg(long)]
    region: Option<String>,
}

fn load_settings(args: &Args) -> Result<DashboardSettings> {
    let mut settings = match &args.config {
        Some(path) => DashboardSettings::load(path)?,
        None => DashboardSettings::default(),
    };
    if let Some(data) = &args.data {
        settings.data_path = data.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn build_context(args: &Args, service: &DashboardService) -> Result<DashboardContext> {
    let mut context = if !args.years.is_empty() {
        let years = args
            .years
            .iter()
            .map(|y| FiscalYear::parse(y))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        DashboardContext::new(PeriodSelection::Years { years })
    } else if args.by_year {
        DashboardContext::new(service.settings().default_year_selection(service.dataset().periods()))
    } else if let Some(count) = args.recent {
        DashboardContext::new(PeriodSelection::Recent { count })
    } else {
        service.initial_context()?
    };
    if let Some(region) = &args.region {
        context = context.with_region(region.parse::<Region>()?);
    }
    Ok(context)
}

fn file_name(dir: &Path, name: String, files: &mut Vec<String>) -> PathBuf {
    let path = dir.join(&name);
    files.push(name);
    path
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    info!(data = %settings.data_path.display(), output = %settings.output_dir.display(), "Starting regional report");

    let service = DashboardService::open(settings.clone())
        .with_context(|| format!("failed to load {}", settings.data_path.display()))?;
    let context = build_context(&args, &service)?;
    let selected = service.select_periods(&context)?;
    info!(periods = selected.periods.len(), region = ?context.region, "Resolved selection");

    let out = settings.output_dir.as_path();
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut files = Vec::new();

    for metric in Metric::ALL {
        let table = service.build_pivot(&context, metric)?;
        let path = file_name(out, format!("{}.csv", metric), &mut files);
        write_pivot_csv(&path, &table, CellFormat::for_metric(metric))?;
    }

    for metric in GROWTH_METRICS {
        let growth = service.calculate_growth(&context, metric)?;
        let path = file_name(out, format!("{}_yoy.csv", metric), &mut files);
        write_pivot_csv(&path, &growth.table, CellFormat::PERCENT)?;

        let seasonal = service.seasonal_averages(metric);
        let path = file_name(out, format!("{}_seasonal.csv", metric), &mut files);
        write_pivot_csv(&path, &seasonal, CellFormat::for_metric(metric))?;
    }

    if let Some(region) = context.region {
        let detail = service.region_detail(&context)?;
        let path = file_name(out, format!("region_{}.csv", region.name().to_lowercase()), &mut files);
        write_region_detail_csv(&path, &detail)?;
    }

    let augmented = service.augmented_records(None, &GROWTH_METRICS)?;
    let path = file_name(out, "augmented.csv".to_string(), &mut files);
    write_augmented_csv(&path, &augmented, &GROWTH_METRICS)?;

    let manifest = ReportManifest {
        generated_at: Utc::now(),
        source: settings.data_path.display().to_string(),
        dataset_fingerprint: format!("{:016x}", service.dataset().fingerprint()),
        selection: context.selection.clone(),
        periods: selected.columns,
        region: context.region.map(|r| r.name().to_string()),
        files,
    };
    write_manifest(&out.join(MANIFEST_FILENAME), &manifest)?;

    info!(files = manifest.files.len(), "Report written");
    Ok(())
}

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use polars::prelude::{DataFrame, DataType};
use taskreport_core::render::{download_file_name, render_clipboard_csv, render_xlsx};
use taskreport_core::timestamps::{
    parse_cutoff, AdjustedTimestamp, DEFAULT_LEAD_MINUTES, DEFAULT_RECEIPT_LAG_HOURS,
};
use taskreport_core::transform::{latest_receipt, stamp_crystallization};
use taskreport_core::{parse_exclusions, Pipeline, PipelineRequest, RegionProfile, RegionRegistry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Transforms robot task-report exports for database ingestion", long_about = None)]
struct Cli {
    /// Server table (TOML); falls back to TASKREPORT_SERVERS, then the built-in table
    #[arg(long, global = true)]
    servers: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform one uploaded export
    Process(ProcessArgs),
    /// List the configured servers
    Servers,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StampPolicy {
    /// Region-local time now plus the lead
    Lead,
    /// Latest receipt time in the output plus one hour
    LatestReceipt,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Export to transform (.csv, .xlsx, .xlsm or .xls)
    file: PathBuf,

    /// Server the export came from
    #[arg(long)]
    server: String,

    /// Keep rows whose receive task report time is after this (YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    cutoff: String,

    /// Comma separated serial numbers to leave out
    #[arg(long)]
    exclude: Option<String>,

    /// Append empty lat/lng columns
    #[arg(long)]
    coordinates: bool,

    #[arg(long, value_enum, default_value_t = StampPolicy::Lead)]
    stamp_policy: StampPolicy,

    /// Minutes added to the current region time by the lead policy
    #[arg(long, default_value_t = DEFAULT_LEAD_MINUTES)]
    lead_minutes: i64,

    /// Directory for the transformed workbook
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Write header-less rows here ("-" for stdout)
    #[arg(long)]
    clipboard: Option<PathBuf>,

    /// Rows shown in the preview table
    #[arg(long, default_value_t = 10)]
    preview: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let registry = load_registry(cli.servers.as_deref())?;

    match cli.command {
        Command::Process(args) => handle_process(registry, args),
        Command::Servers => handle_servers(&registry),
    }
}

fn load_registry(explicit: Option<&Path>) -> Result<RegionRegistry> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os("TASKREPORT_SERVERS").map(PathBuf::from));

    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading server table");
            RegionRegistry::from_path(&path)
                .with_context(|| format!("failed to load server table {}", path.display()))
        }
        None => RegionRegistry::builtin().context("built-in server table is invalid"),
    }
}

fn handle_servers(registry: &RegionRegistry) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Server", "Units", "Cadence", "UTC offset", "Primary"]);
    for profile in registry.iter() {
        table.add_row(vec![
            profile.server_id.clone(),
            profile.units.to_string(),
            profile.cadence.task_label().to_string(),
            format!("{:+}", profile.utc_offset_hours),
            if profile.primary { "yes" } else { "" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_process(registry: RegionRegistry, args: ProcessArgs) -> Result<()> {
    let pipeline = Pipeline::new(registry);
    let profile = pipeline
        .registry()
        .resolve(&args.server)
        .with_context(|| {
            let known: Vec<&str> = pipeline.registry().server_ids().collect();
            format!("known servers: {}", known.join(", "))
        })?
        .clone();
    println!("Processing upload for {} ({})", profile.server_id, profile.cadence.task_label());

    if parse_cutoff(&args.cutoff).is_err() {
        bail!("Invalid datetime format.");
    }

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("upload path has no file name")?;
    let bytes = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let exclude = args.exclude.as_deref().and_then(parse_exclusions);

    let lead = lead_stamp(&profile, Utc::now(), args.lead_minutes)?;

    let mut report = pipeline.process(&PipelineRequest {
        file_name: &file_name,
        bytes: &bytes,
        server_id: &profile.server_id,
        cutoff: &args.cutoff,
        adjusted_timestamp: lead.as_str(),
        exclude: exclude.as_ref(),
        with_coordinates: args.coordinates,
    })?;

    if let StampPolicy::LatestReceipt = args.stamp_policy {
        match latest_receipt(&report.table, profile.units)? {
            Some(latest) => {
                let stamp = Duration::try_hours(DEFAULT_RECEIPT_LAG_HOURS)
                    .and_then(|lag| AdjustedTimestamp::after_latest_receipt(latest, lag))
                    .with_context(|| format!("receipt stamp after {latest} is out of range"))?;
                stamp_crystallization(&mut report.table, profile.units, stamp.as_str())?;
                info!(stamp = stamp.as_str(), "Restamped from latest receipt");
            }
            None => warn!("No rows to derive a receipt stamp from; keeping lead stamp"),
        }
    }

    println!("{}", preview_table(&report.table, args.preview)?);
    println!("{}", report.summary());

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;
    let workbook_path = args
        .output_dir
        .join(download_file_name(&profile.server_id, &file_name));
    fs::write(&workbook_path, render_xlsx(&report.table)?)
        .with_context(|| format!("failed to write {}", workbook_path.display()))?;
    println!("Wrote {}", workbook_path.display());

    if let Some(target) = args.clipboard {
        let rows = render_clipboard_csv(&report.table)?;
        if target.as_os_str() == "-" {
            std::io::stdout().write_all(rows.as_bytes())?;
        } else {
            fs::write(&target, rows)
                .with_context(|| format!("failed to write {}", target.display()))?;
            println!("Wrote {}", target.display());
        }
    }

    Ok(())
}

fn lead_stamp(profile: &RegionProfile, now: DateTime<Utc>, lead_minutes: i64) -> Result<AdjustedTimestamp> {
    Duration::try_minutes(lead_minutes)
        .and_then(|lead| AdjustedTimestamp::lead_from_now(profile, now, lead))
        .with_context(|| format!("--lead-minutes {lead_minutes} is out of range"))
}

fn preview_table(df: &DataFrame, limit: usize) -> Result<Table> {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
    );

    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.cast(&DataType::String))
        .collect::<Result<Vec<_>, _>>()?;
    let values = columns
        .iter()
        .map(|column| column.str())
        .collect::<Result<Vec<_>, _>>()?;

    for row in 0..df.height().min(limit) {
        table.add_row(
            values
                .iter()
                .map(|ca| ca.get(row).unwrap_or_default().to_string())
                .collect::<Vec<_>>(),
        );
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn spore() -> RegionProfile {
        RegionRegistry::builtin()
            .expect("builtin servers")
            .resolve("GS SPORE")
            .expect("spore")
            .clone()
    }

    #[test]
    fn lead_stamp_uses_region_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 50, 42).unwrap();
        let stamp = lead_stamp(&spore(), now, 15).expect("stamp");
        assert_eq!(stamp.as_str(), "2024-05-01 10:05:00");
    }

    #[test]
    fn oversized_lead_is_an_error_not_a_panic() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 50, 42).unwrap();
        let err = lead_stamp(&spore(), now, i64::MAX).expect_err("lead accepted");
        assert!(err.to_string().contains("out of range"));
        assert!(lead_stamp(&spore(), now, i64::MAX / 60_000).is_err());
    }
}

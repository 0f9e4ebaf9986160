use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use colored::Colorize;
use kibom_bom::{build_rows, rows_json, write_csv, write_table, BomConfig};
use kibom_netlist::{group_components, Netlist};

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum OutputFormat {
    /// Dated CSV file in the output directory
    #[default]
    Csv,
    /// Terminal table on stdout
    Table,
    /// JSON on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// KiCad XML netlist to process
    #[arg(value_name = "NETLIST", value_hint = clap::ValueHint::FilePath)]
    pub netlist: PathBuf,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output directory for CSV (defaults to Factory/ next to the netlist)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Classification tables TOML; built-in tables when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Classify by designator prefix only, ignoring footprint namespaces
    #[arg(long)]
    pub no_smart: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BomConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BomConfig::default(),
    };
    if args.no_smart {
        config.smart = false;
    }

    let netlist = Netlist::parse_file(&args.netlist)
        .with_context(|| format!("failed to read netlist {}", args.netlist.display()))?;
    let components = netlist.interesting_components();
    let groups = group_components(&components);
    let rows = build_rows(&config, &groups);
    log::info!(
        "{} components in {} groups, {} BOM rows",
        components.len(),
        groups.len(),
        rows.len()
    );

    match args.format {
        OutputFormat::Json => {
            let mut writer = io::stdout().lock();
            writeln!(writer, "{}", rows_json(&rows))?;
        }
        OutputFormat::Table => {
            write_table(&rows, io::stdout().lock())?;
        }
        OutputFormat::Csv => {
            let dir = args
                .output
                .clone()
                .unwrap_or_else(|| default_output_dir(&args.netlist));
            if !dir.exists() {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                log::info!("created {}", dir.display());
            }

            let path = dir.join(csv_filename(chrono::Local::now().date_naive()));
            let file = fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(&rows, file).context("failed to write CSV")?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    Ok(())
}

/// Factory/ directory next to the netlist, matching where assembly files
/// are conventionally collected.
fn default_output_dir(netlist: &Path) -> PathBuf {
    netlist.parent().unwrap_or(Path::new(".")).join("Factory")
}

fn csv_filename(date: NaiveDate) -> String {
    format!("BOM_{}.csv", date.format("%d-%m-%Y"))
}

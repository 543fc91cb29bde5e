use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use table2json::{
    ConvertOptions, Entries, Grid, HeaderSpec, Preset, convert_table_data_to_json,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "table2json",
    version,
    about = "Convert tabular data into nested JSON records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a JSON or CSV table and write JSON output.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input table path (JSON array of rows, or CSV).
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format; guessed from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Header preset: row, column, row.column, column.row, row.row, column.column.
    #[arg(long)]
    preset: Option<String>,

    /// Explicit header descriptor in format kind:column:row. Repeatable.
    #[arg(long = "header")]
    headers: Vec<String>,

    /// JSON configuration file with `preset` and `headers`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV field delimiter.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Write JSON on a single line.
    #[arg(long)]
    compact: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn detect_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

fn parse_options(args: &ConvertArgs) -> Result<ConvertOptions<'static>> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            let config: Value = serde_json::from_str(&text)
                .with_context(|| format!("config '{}' is not valid JSON", path.display()))?;
            ConvertOptions::from_json(&config)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => ConvertOptions::default(),
    };

    if let Some(preset) = &args.preset {
        options.preset = preset
            .parse::<Preset>()
            .map_err(|error| anyhow!("invalid --preset '{preset}': {error}"))?;
    }

    if !args.headers.is_empty() {
        options.headers = args
            .headers
            .iter()
            .map(|spec| {
                spec.parse::<HeaderSpec>()
                    .map_err(|error| anyhow!("invalid --header: {error}"))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(options)
}

fn read_grid(args: &ConvertArgs) -> Result<Grid> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let format = args.format.unwrap_or_else(|| detect_format(&args.input));
    let grid = match format {
        InputFormat::Json => {
            let text = fs::read_to_string(&args.input)?;
            Grid::from_json_str(&text)?
        }
        InputFormat::Csv => Grid::from_csv_reader(File::open(&args.input)?, args.delimiter as u8)?,
    };
    Ok(grid)
}

fn write_output(entries: &Entries, args: &ConvertArgs) -> Result<()> {
    let mut json = if args.compact {
        serde_json::to_string(entries)?
    } else {
        serde_json::to_string_pretty(entries)?
    };
    json.push('\n');

    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => io::stdout()
            .lock()
            .write_all(json.as_bytes())
            .context("failed to write to stdout"),
    }
}

fn run_convert(args: &ConvertArgs) -> Result<Entries> {
    let mut options = parse_options(args)?;
    let grid = read_grid(args)
        .with_context(|| format!("failed to read table from '{}'", args.input.display()))?;
    let entries = convert_table_data_to_json(&grid, &mut options)
        .with_context(|| format!("failed to convert '{}'", args.input.display()))?;
    write_output(&entries, args)?;
    Ok(entries)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Convert(args) = &cli.command;

    let default_filter = if args.verbose {
        "table2json=debug"
    } else {
        "table2json=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    match run_convert(args) {
        Ok(entries) if entries.is_empty() => {
            eprintln!("warning: no entries were produced");
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

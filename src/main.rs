//! flatcut - Flatten Premiere Pro timelines to CSV

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};

use flatcut::export::{CsvConfig, CsvExporter, Exporter, JsonConfig, JsonExporter, SortOrder};
use flatcut::{FlattenConfig, Project, Row};

#[derive(Parser)]
#[command(name = "flatcut")]
#[command(version, about = "Flatten Premiere Pro timelines into clip lists", long_about = None)]
#[command(after_help = "EXAMPLES:
    flatcut edit.prproj --list                 List sequences
    flatcut edit.prproj -s Main -o main.csv    Export sequence 'Main' as CSV
    flatcut edit.prproj -s Main --format json  Print sequence 'Main' as JSON")]
struct Cli {
    /// Project file (.prproj or uncompressed XML)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Sequence to flatten (defaults to the only sequence)
    #[arg(short, long, value_name = "NAME")]
    sequence: Option<String>,

    /// List sequence names and exit
    #[arg(short, long)]
    list: bool,

    /// Keep nested sequences as single clips
    #[arg(long)]
    no_expand: bool,

    /// Also emit the clip that holds each expanded nested sequence
    #[arg(long)]
    include_parent: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Row order
    #[arg(long, value_enum, default_value_t = Order::Chronological)]
    order: Order,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Traversal,
    Chronological,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Traversal => SortOrder::Traversal,
            Order::Chronological => SortOrder::Chronological,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = if cli.list {
        list_sequences(&cli.input)
    } else {
        flatten(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn list_sequences(path: &str) -> Result<(), String> {
    let project = Project::open(path).map_err(|e| e.to_string())?;
    for name in project.sequence_names() {
        println!("{name}");
    }
    Ok(())
}

fn flatten(cli: &Cli) -> Result<(), String> {
    let project = Project::open(&cli.input).map_err(|e| e.to_string())?;
    let sequence = choose_sequence(&project, cli.sequence.as_deref())?;

    let config = FlattenConfig::new()
        .with_expand_nested(!cli.no_expand)
        .with_include_parent_row(cli.include_parent);
    let rows = project
        .flatten(&sequence, &config)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("sequence '{sequence}' not found"))?;
    if rows.is_empty() {
        return Err(format!("no clips found in sequence '{sequence}'"));
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("{path}: {e}"))?;
            write_rows(cli, &rows, &mut BufWriter::new(file)).map_err(|e| e.to_string())?;
            if !cli.quiet {
                eprintln!("Wrote {} rows from '{sequence}' to {path}", rows.len());
            }
        }
        None => {
            write_rows(cli, &rows, &mut io::stdout().lock()).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

/// Pick the requested sequence, or the only one the project has.
fn choose_sequence(project: &Project, requested: Option<&str>) -> Result<String, String> {
    if let Some(name) = requested {
        return Ok(name.to_string());
    }
    match project.sequence_names().as_slice() {
        [] => Err("project contains no sequences".to_string()),
        [only] => Ok(only.to_string()),
        names => Err(format!(
            "project has {} sequences, choose one with --sequence:\n  {}",
            names.len(),
            names.join("\n  ")
        )),
    }
}

fn write_rows<W: Write>(cli: &Cli, rows: &[Row], writer: &mut W) -> io::Result<()> {
    let sort = SortOrder::from(cli.order);
    match cli.format {
        OutputFormat::Csv => CsvExporter::with_config(CsvConfig { sort, header: true }).export(rows, writer),
        OutputFormat::Json => {
            JsonExporter::with_config(JsonConfig { sort, pretty: true }).export(rows, writer)
        }
    }
}

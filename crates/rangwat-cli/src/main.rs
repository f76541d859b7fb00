//! Rangwat CLI - survey request export and upload tool

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rangwat::prelude::*;
use rangwat::XlsxReader;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rangwat")]
#[command(author, version, about = "Survey request export and upload tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export survey requests from a JSON file to xlsx or csv
    Export {
        /// JSON file holding an array of survey requests
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (xlsx or csv)
        #[arg(short, long, default_value = "xlsx")]
        format: ExportFormat,

        /// Text to search for in request number, applicant, surveyor and status
        #[arg(long, default_value = "")]
        search: String,

        /// Only export this status ("all" for every status)
        #[arg(long, default_value = "all")]
        status: String,

        /// Earliest appointment date (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<NaiveDate>,

        /// Latest appointment date (YYYY-MM-DD)
        #[arg(long)]
        date_to: Option<NaiveDate>,

        /// Worksheet name
        #[arg(long, default_value = "Survey Data")]
        sheet_name: String,

        /// Output file (default: timestamped name in --out-dir)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory for the timestamped export file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Parse and validate an uploaded spreadsheet
    Import {
        /// Input xlsx file
        input: PathBuf,

        /// Write the parsed rows as JSON (default: stdout)
        #[arg(short, long, conflicts_with = "store")]
        output: Option<PathBuf>,

        /// Replace every request in this JSON store with the parsed rows
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Look up a single request by request number and applicant name
    Search {
        /// JSON file holding an array of survey requests
        #[arg(short, long)]
        input: PathBuf,

        /// Request number
        request_number: String,

        /// Applicant name
        applicant_name: String,
    },

    /// Show dashboard statistics for a JSON file of survey requests
    Stats {
        /// JSON file holding an array of survey requests
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show sheet name, dimension, column widths and header of an xlsx file
    Inspect {
        /// Input xlsx file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            format,
            search,
            status,
            date_from,
            date_to,
            sheet_name,
            output,
            out_dir,
        } => {
            let filter = SurveyFilter::new()
                .with_search(search)
                .with_status(status)
                .with_date_range(date_from, date_to);
            let options = ExportOptions {
                sheet_name,
                ..ExportOptions::default()
            };
            export(&input, &filter, format, &options, output.as_deref(), &out_dir)
        }
        Commands::Import {
            input,
            output,
            store,
        } => import(&input, output.as_deref(), store.as_deref()),
        Commands::Search {
            input,
            request_number,
            applicant_name,
        } => lookup(&input, SearchQuery::new(request_number, applicant_name)),
        Commands::Stats { input } => stats(&input),
        Commands::Inspect { input } => inspect(&input),
    }
}

fn load_store(input: &Path) -> Result<MemoryStore> {
    let file =
        File::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    MemoryStore::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load requests from '{}'", input.display()))
}

fn export(
    input: &Path,
    filter: &SurveyFilter,
    format: ExportFormat,
    options: &ExportOptions,
    output: Option<&Path>,
    out_dir: &Path,
) -> Result<()> {
    let store = load_store(input)?;
    let requests = store.query(filter).context("Failed to query requests")?;

    let file = build_export(&requests, format, options, Utc::now())
        .with_context(|| format!("Export failed ({} matching requests)", requests.len()))?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => out_dir.join(&file.file_name),
    };
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;

    eprintln!(
        "Exported {} of {} requests to '{}'",
        requests.len(),
        store.len(),
        path.display()
    );
    Ok(())
}

fn import(input: &Path, output: Option<&Path>, store_path: Option<&Path>) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read '{}'", input.display()))?;

    let rows = parse_upload(&bytes)
        .with_context(|| format!("Failed to parse '{}'", input.display()))?;
    validate_upload(&rows)?;

    if let Some(store_path) = store_path {
        return commit(rows, store_path);
    }

    let json = serde_json::to_string_pretty(&rows).context("Failed to serialize rows")?;
    if let Some(output_path) = output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote {} rows to '{}'", rows.len(), output_path.display());
    } else {
        let mut stdout = io::stdout();
        stdout
            .write_all(json.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn commit(rows: Vec<UploadRow>, store_path: &Path) -> Result<()> {
    let mut store = if store_path.exists() {
        load_store(store_path)?
    } else {
        MemoryStore::default()
    };
    let previous = store.len();
    let stored = store
        .replace_all(rows, Utc::now())
        .context("Failed to store uploaded rows")?;

    let json =
        serde_json::to_string_pretty(store.requests()).context("Failed to serialize requests")?;
    std::fs::write(store_path, json)
        .with_context(|| format!("Failed to write '{}'", store_path.display()))?;

    eprintln!("{}", rangwat::upload_message(stored));
    eprintln!(
        "Replaced {} requests in '{}'",
        previous,
        store_path.display()
    );
    Ok(())
}

fn lookup(input: &Path, query: SearchQuery) -> Result<()> {
    let mut store = load_store(input)?;
    let request = match search(&mut store, &query, &client_ip(None, None), Utc::now()) {
        Ok(request) => request,
        Err(e) => bail!("{} ({})", e, e.status_code()),
    };

    let json = serde_json::to_string_pretty(&request).context("Failed to serialize request")?;
    println!("{}", json);
    Ok(())
}

fn stats(input: &Path) -> Result<()> {
    let store = load_store(input)?;
    let offset = ExportOptions::default().offset();
    let stats = store
        .stats(Utc::now(), offset)
        .context("Failed to compute statistics")?;

    let json = serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
    println!("{}", json);
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let contents = XlsxReader::read_file(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheet: {}", contents.name);
    match &contents.dimension {
        Some(range) => println!("Dimension: {}", range),
        None => println!("Dimension: (none)"),
    }
    println!("Rows: {}", contents.rows.len());

    if !contents.columns.is_empty() {
        println!("Column widths:");
        for col in &contents.columns {
            println!("  {}-{}: {}", col.min, col.max, col.width);
        }
    }

    if let Some(header) = contents.rows.first() {
        let names: Vec<String> = header.iter().map(|v| v.to_string()).collect();
        println!("Header: {}", names.join(" | "));
    }

    Ok(())
}

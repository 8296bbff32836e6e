//! Sheetload CLI - extract workbook records and upload them in batches
//!
//! # Main Commands
//!
//! ```bash
//! sheetload run --config mapping.json --file hosts.xlsx    # Extract and upload
//! sheetload serve                                          # Start a local echo sink
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! sheetload inspect --config mapping.json --file hosts.xlsx   # Show resolved schemas
//! sheetload run --config mapping.json --file hosts.xlsx --dry-run
//! ```

use clap::{Parser, Subcommand};
use sheetload::{
    load_config, open_workbook_file, resolve_schema, HttpUploader, LogUploader, RunOptions,
    RunSummary, Uploader, WorkbookWorker,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetload")]
#[command(about = "Extract object records from spreadsheet workbooks and upload them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a workbook and upload the records
    Run {
        /// Mapping file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Workbook file (XLSX)
        #[arg(short, long)]
        file: PathBuf,

        /// Sink endpoint (default: SHEETLOAD_ENDPOINT)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Records per uploaded batch
        #[arg(long, default_value = "10")]
        batch_size: usize,

        /// Log the batches instead of uploading them
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve the mapping against each sheet and print the schemas
    Inspect {
        /// Mapping file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Workbook file (XLSX)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Start a local echo sink
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "9529")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            file,
            endpoint,
            batch_size,
            dry_run,
        } => cmd_run(&config, &file, endpoint, batch_size, dry_run).await,

        Commands::Inspect { config, file } => cmd_inspect(&config, &file),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_run(
    config_path: &Path,
    file: &Path,
    endpoint: Option<String>,
    batch_size: usize,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", file.display());

    let config = load_config(config_path)?;
    let options = RunOptions { batch_size };

    let summary = if dry_run {
        run_with(config, LogUploader::new(), options, file).await?
    } else {
        let uploader = match endpoint {
            Some(url) => HttpUploader::new(url),
            None => HttpUploader::from_env().ok_or(
                "no endpoint configured (use --endpoint or set SHEETLOAD_ENDPOINT)",
            )?,
        };
        eprintln!("   Endpoint: {}", uploader.endpoint());
        run_with(config, uploader, options, file).await?
    };

    eprintln!("\n📊 Summary:");
    for sheet in &summary.sheets {
        eprintln!(
            "   {}: {} rows, {} records in {} batches, {} dropped",
            sheet.sheet,
            sheet.rows_seen,
            sheet.records_emitted,
            sheet.batches_sent,
            sheet.rows_dropped
        );
    }
    if summary.sheets_skipped > 0 {
        eprintln!("   ({} empty sheets skipped)", summary.sheets_skipped);
    }
    eprintln!(
        "✅ Uploaded {} records in {} batches",
        summary.records_emitted(),
        summary.batches_sent()
    );

    Ok(())
}

async fn run_with<U: Uploader + Clone>(
    config: sheetload::RawConfig,
    uploader: U,
    options: RunOptions,
    file: &Path,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let worker = WorkbookWorker::new(config, uploader, options);
    Ok(worker.run(file).await?)
}

fn cmd_inspect(config_path: &Path, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Inspecting: {}", file.display());

    let config = load_config(config_path)?;
    let sheets = open_workbook_file(file)?;

    for sheet in &sheets {
        if sheet.row_count() == 0 || sheet.column_count() == 0 {
            eprintln!("\n📄 Sheet '{}': empty, skipped", sheet.name());
            continue;
        }
        let header = sheet.row(config.header_row).unwrap_or(&[]);
        match resolve_schema(&config, header) {
            Ok(schema) => {
                eprintln!(
                    "\n📄 Sheet '{}' ({} rows, {} content fields):",
                    sheet.name(),
                    sheet.row_count(),
                    schema.content.len()
                );
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            Err(e) => {
                return Err(format!("sheet '{}': {}", sheet.name(), e).into());
            }
        }
    }

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    sheetload::server::start_server(port).await
}

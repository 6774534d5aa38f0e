// reset; cargo run -- --clients ./data/clients.csv --workers ./data/workers.csv --tasks ./data/tasks.csv
// reset; cargo run -- --clients ./data/clients.xlsx --workers ./data/workers.xlsx --tasks ./data/tasks.xlsx --sheet-name Sheet1 --strict

use clap::Parser;
use cleaner_lib::{
    DataStore, EntityKind, ERRORS_LOG_FILE, format_validation_report, parse_file, suggest_fixes,
    utils::write_error_to_log, write_bundle,
};
use sheet_cleaner::utils::{exit_status, generate_bundle_dirname, resolve_settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-cleaner")]
#[command(about = "A tool to clean and validate client, worker and task spreadsheets")]
#[command(version)]
struct Args {
    /// Path to the clients spreadsheet (.csv, .xlsx or .xls)
    #[arg(long)]
    clients: String,

    /// Path to the workers spreadsheet (.csv, .xlsx or .xls)
    #[arg(long)]
    workers: String,

    /// Path to the tasks spreadsheet (.csv, .xlsx or .xls)
    #[arg(long)]
    tasks: String,

    /// Optional sheet name to read from Excel files (if not specified, reads the first sheet)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Optional JSON file with validation settings
    #[arg(long)]
    settings: Option<String>,

    /// Directory for the cleaned CSV files and the validation report (defaults to a timestamped directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Report warnings as errors
    #[arg(long)]
    strict: bool,

    /// Also run the heuristic anomaly checks
    #[arg(long)]
    anomalies: bool,
}

fn main() -> anyhow::Result<()> {
    let arguments = Args::parse();
    let settings = resolve_settings(
        arguments.settings.as_deref(),
        arguments.strict,
        arguments.anomalies,
    )?;

    let mut store = DataStore::new();
    let inputs = [
        (EntityKind::Clients, &arguments.clients),
        (EntityKind::Workers, &arguments.workers),
        (EntityKind::Tasks, &arguments.tasks),
    ];
    for (kind, path) in inputs {
        let result = parse_file(path, kind, arguments.sheet_name.as_deref());
        println!(
            "📄 {}: {} records from {} rows (data quality {:.0}%)",
            kind,
            result.records.len(),
            result.parsing_metadata.rows_processed,
            result.parsing_metadata.data_quality_score * 100.0
        );
        for warning in &result.warnings {
            println!("   ⚠️  {warning}");
        }
        for error in &result.errors {
            eprintln!("   ❌ {error}");
        }
        store.load(result);
    }

    let summary = store.run_validation(&settings);
    if summary.total_errors == 0 {
        println!("✅ Validation completed!");
    } else {
        println!(
            "❌ Validation found {} issues ({} errors, {} warnings)",
            summary.total_errors, summary.critical_errors, summary.warnings
        );
        for (error_type, count) in &summary.errors_by_type {
            println!("   {error_type}: {count}");
        }
        write_error_to_log(
            "Validation Error Report",
            &format_validation_report(store.validation_errors()),
        );
        eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
    }

    let suggestions = suggest_fixes(store.validation_errors());
    if !suggestions.is_empty() {
        println!("🔧 {} suggested fixes:", suggestions.len());
        for suggestion in &suggestions {
            match &suggestion.proposed_value {
                Some(value) => println!(
                    "   {}: {} (set to {})",
                    suggestion.error_id,
                    suggestion.suggested_fix,
                    serde_json::to_string(value)?
                ),
                None => println!("   {}: {}", suggestion.error_id, suggestion.suggested_fix),
            }
        }
    }

    let output_dir = arguments
        .output_dir
        .unwrap_or_else(|| PathBuf::from(generate_bundle_dirname("cleaned")));
    let written = write_bundle(&output_dir, &store, &summary)?;
    for path in &written {
        println!("✅ Written: {}", path.display());
    }

    let status = exit_status(&summary);
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}

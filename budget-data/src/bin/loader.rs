use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_data::{GoalCsvLoader, ImportMode};
use budget_db_sqlite::SqliteRepository;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Import savings goals for one user from a CSV file into the database.
///
/// The CSV file may have any of the following columns (matched by header):
/// - name: goal name
/// - target: amount to save (e.g. 1,200.00 or $500)
/// - created: plan start date, YYYY-MM-DD
/// - deadline: due date, YYYY-MM-DD
/// - saved_so_far: amount already saved
///
/// Blank or unreadable values are replaced with defaults and reported.
#[derive(Parser, Debug)]
#[command(name = "budget-goal-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing goals
    #[arg(short, long)]
    file: PathBuf,

    /// User whose goals are imported
    #[arg(short, long)]
    user: String,

    /// SQLite database path or URL; the file is created if missing
    #[arg(short, long, default_value = "budget.db")]
    database: String,

    /// Keep the user's existing goals and add the imported ones after them
    #[arg(short, long, default_value_t = false)]
    append: bool,

    /// Date that stands in for missing dates (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    today: Option<NaiveDate>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let mode = if args.append {
        ImportMode::Append
    } else {
        ImportMode::Replace
    };

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;
    repo.run_migrations()
        .await
        .context("Failed to run migrations")?;

    println!("Loading goals from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = GoalCsvLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let summary = GoalCsvLoader::load(&repo, &args.user, &records, today, mode)
        .await
        .context("Failed to load goals into database")?;

    println!(
        "Successfully imported {} goals for '{}' ({} fields defaulted).",
        summary.imported, args.user, summary.defaulted_fields
    );

    Ok(())
}

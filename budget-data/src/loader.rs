use std::io::Read;

use budget_core::{GoalRepository, RawGoal, RepositoryError, normalize_goals};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur when importing goal data.
#[derive(Debug, Error)]
pub enum GoalLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for GoalLoaderError {
    fn from(err: csv::Error) -> Self {
        GoalLoaderError::CsvParse(err.to_string())
    }
}

/// What happens to goals the user already has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// The imported goals become the user's whole goal set.
    #[default]
    Replace,
    /// The imported goals are added after the existing ones.
    Append,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Goals written from the file.
    pub imported: usize,
    /// Fields across all imported goals that fell back to a default.
    pub defaulted_fields: usize,
}

/// A single row of a goals CSV file.
///
/// Columns are matched by header name and every column is optional:
/// - `name`: goal name
/// - `target`: amount to save, e.g. `1,200.00` or `$500`
/// - `created`: plan start date (`YYYY-MM-DD`)
/// - `deadline`: due date (`YYYY-MM-DD`)
/// - `saved_so_far`: amount already saved
///
/// Any other column is ignored. Values are kept as text; the normalizer
/// decides what they mean.
///
/// `RawGoal` itself is not read directly: its amount fields accept numbers,
/// and the CSV deserializer guesses cell types for those, turning
/// `79228162514264337593543950335` into a rounded float and rejecting `true`.
/// Plain `String` fields keep every cell verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct GoalRecord {
    name: Option<String>,
    target: Option<String>,
    created: Option<String>,
    deadline: Option<String>,
    saved_so_far: Option<String>,
}

impl From<GoalRecord> for RawGoal {
    fn from(record: GoalRecord) -> Self {
        Self {
            name: record.name,
            target: record.target,
            created: record.created,
            deadline: record.deadline,
            saved_so_far: record.saved_so_far,
        }
    }
}

/// Loader for goal data from CSV files.
///
/// Records go through the same normalization as goals typed in by hand, then
/// are stored via the `GoalRepository` trait so any backend works.
pub struct GoalCsvLoader;

impl GoalCsvLoader {
    /// Parse goal records from a CSV reader.
    ///
    /// Only structural problems (bad quoting, unreadable input) are errors.
    /// Blank or malformed values come through as text and are defaulted later.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RawGoal>, GoalLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: GoalRecord = result?;
            records.push(RawGoal::from(record));
        }

        Ok(records)
    }

    /// Normalize `records` and store them for `user_id`.
    ///
    /// In [`ImportMode::Replace`] the user's existing goals are discarded. In
    /// [`ImportMode::Append`] they are kept and the new goals follow them.
    /// Either way the write is a single `save`, so a failed import leaves the
    /// previous goal set intact.
    pub async fn load<R: GoalRepository + ?Sized>(
        repo: &R,
        user_id: &str,
        records: &[RawGoal],
        today: NaiveDate,
        mode: ImportMode,
    ) -> Result<ImportSummary, GoalLoaderError> {
        let normalized = normalize_goals(records, today);

        let mut defaulted_fields = 0;
        for (row, goal) in normalized.iter().enumerate() {
            defaulted_fields += goal.defaulted.len();
            if goal.has_lossy_defaults() {
                warn!(
                    row = row + 1,
                    name = %goal.goal.name,
                    "imported goal has unreadable values that were defaulted"
                );
            }
        }

        let mut goals = match mode {
            ImportMode::Replace => Vec::with_capacity(normalized.len()),
            ImportMode::Append => repo.load(user_id).await?,
        };
        let imported = normalized.len();
        goals.extend(normalized.into_iter().map(|n| n.goal));

        repo.save(user_id, &goals).await?;
        info!(user_id, imported, ?mode, "imported goals");

        Ok(ImportSummary {
            imported,
            defaulted_fields,
        })
    }
}

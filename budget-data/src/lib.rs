//! Bulk import of goal records from CSV files.

mod loader;

pub use loader::{GoalCsvLoader, GoalLoaderError, ImportMode, ImportSummary};

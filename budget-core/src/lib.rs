pub mod calculations;
pub mod db;
pub mod models;
pub mod normalize;
pub mod starter;

pub use calculations::{AllocationWorksheet, allocate_raw};
pub use db::repository::{GoalRepository, RepositoryError};
pub use models::*;
pub use normalize::{DefaultReason, DefaultedField, GoalField, NormalizedGoal, normalize_goal, normalize_goals};

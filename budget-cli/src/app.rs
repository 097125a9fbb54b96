//! Command handlers shared by the `budget` binary and its tests.

use anyhow::{Context, Result};
use budget_core::db::RepositoryRegistry;
use budget_core::starter::starter_goals;
use budget_core::{AllocationResult, AllocationWorksheet, Goal, GoalRepository, PayCycle, RepositoryError};
use budget_db_sqlite::SqliteRepositoryFactory;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Registry with every storage backend compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub async fn list_users(repo: &dyn GoalRepository) -> Result<Vec<String>> {
    repo.list_users().await.context("Failed to list users")
}

pub async fn list_goals(repo: &dyn GoalRepository, user_id: &str) -> Result<Vec<Goal>> {
    repo.load(user_id)
        .await
        .with_context(|| format!("Failed to load goals for '{}'", user_id))
}

/// Appends `goal` to the user's goals and returns its 1-based position.
pub async fn add_goal(repo: &dyn GoalRepository, user_id: &str, goal: Goal) -> Result<usize> {
    let mut goals = list_goals(repo, user_id).await?;
    info!(user_id, goal = %goal.name, "adding goal");
    goals.push(goal);
    repo.save(user_id, &goals)
        .await
        .with_context(|| format!("Failed to save goals for '{}'", user_id))?;
    Ok(goals.len())
}

/// Records how much has been saved toward goal number `index` (1-based).
pub async fn set_saved(
    repo: &dyn GoalRepository,
    user_id: &str,
    index: usize,
    amount: Decimal,
) -> Result<Goal> {
    let mut goals = list_goals(repo, user_id).await?;
    let goal = goal_at(&mut goals, index)
        .with_context(|| format!("No goal #{} for '{}'", index, user_id))?;
    goal.saved_so_far = amount;
    let updated = goal.clone();

    repo.save(user_id, &goals)
        .await
        .with_context(|| format!("Failed to save goals for '{}'", user_id))?;
    info!(user_id, goal = %updated.name, saved = %amount, "updated saved amount");
    Ok(updated)
}

/// Deletes goal number `index` (1-based) and returns it.
pub async fn remove_goal(repo: &dyn GoalRepository, user_id: &str, index: usize) -> Result<Goal> {
    let mut goals = list_goals(repo, user_id).await?;
    goal_at(&mut goals, index).with_context(|| format!("No goal #{} for '{}'", index, user_id))?;
    let removed = goals.remove(index - 1);

    repo.save(user_id, &goals)
        .await
        .with_context(|| format!("Failed to save goals for '{}'", user_id))?;
    info!(user_id, goal = %removed.name, "removed goal");
    Ok(removed)
}

/// What an `allocate` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Goals the allocation was computed from, as loaded or seeded.
    pub goals: Vec<Goal>,
    pub result: AllocationResult,
    /// True when the user had no goals and starter goals were stored.
    pub seeded: bool,
}

/// Splits the paycheck described by `cycle` across the user's goals.
///
/// A user without goals is given the starter set first. With `write_back`
/// the effective saved amounts are stored as each goal's `saved_so_far`.
pub async fn allocate(
    repo: &dyn GoalRepository,
    user_id: &str,
    cycle: &PayCycle,
    today: NaiveDate,
    write_back: bool,
) -> Result<Allocation> {
    let mut goals = list_goals(repo, user_id).await?;
    let seeded = goals.is_empty();
    if seeded {
        goals = starter_goals(today);
        repo.save(user_id, &goals)
            .await
            .with_context(|| format!("Failed to store starter goals for '{}'", user_id))?;
        info!(user_id, count = goals.len(), "seeded starter goals");
    }

    debug!(user_id, goals = goals.len(), pay_date = %cycle.pay_date, "allocating paycheck");
    let result = AllocationWorksheet::new(cycle).calculate(&goals);

    if write_back {
        let persisted = result.persisted_goals(&goals);
        repo.save(user_id, &persisted)
            .await
            .with_context(|| format!("Failed to write back saved amounts for '{}'", user_id))?;
        info!(user_id, "wrote back effective saved amounts");
    }

    Ok(Allocation {
        goals,
        result,
        seeded,
    })
}

fn goal_at(goals: &mut [Goal], index: usize) -> Result<&mut Goal, RepositoryError> {
    index
        .checked_sub(1)
        .and_then(|i| goals.get_mut(i))
        .ok_or(RepositoryError::NotFound)
}

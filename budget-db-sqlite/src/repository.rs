use std::str::FromStr;

use async_trait::async_trait;
use budget_core::db::validate_user_id;
use budget_core::{Goal, GoalRepository, RepositoryError};
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open the database at `database_url`.
    ///
    /// Accepts a bare file path (created if missing), a `sqlite:` URL, or
    /// `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let in_memory = matches!(database_url.trim(), ":memory:" | "sqlite::memory:");

        let parsed = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)
        } else {
            Ok(SqliteConnectOptions::new().filename(database_url))
        };
        let options = parsed
            .map_err(|e| {
                RepositoryError::Connection(format!(
                    "Invalid database url '{}': {}",
                    database_url, e
                ))
            })?
            .create_if_missing(true);

        // An in-memory database lives only as long as its connection.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            RepositoryError::Connection(format!(
                "Failed to connect to database '{}': {}",
                database_url, e
            ))
        })?;
        debug!(database_url, "opened sqlite database");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::Database(format!("Failed to run database migrations: {}", e))
            })?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn get_date(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<NaiveDate, RepositoryError> {
    let text: String = row
        .try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))?;
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        RepositoryError::Database(format!("Invalid date '{}' in {}: {}", text, column, e))
    })
}

fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> Result<Goal, RepositoryError> {
    Ok(Goal {
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        target: get_decimal(row, "target")?,
        created: get_date(row, "created")?,
        deadline: get_date(row, "deadline")?,
        saved_so_far: get_decimal(row, "saved_so_far")?,
    })
}

#[async_trait]
impl GoalRepository for SqliteRepository {
    async fn load(&self, user_id: &str) -> Result<Vec<Goal>, RepositoryError> {
        let user_id = validate_user_id(user_id)?;

        let rows = sqlx::query(
            "SELECT name, target, created, deadline, saved_so_far
             FROM goals WHERE user_id = ? ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let goals = rows
            .iter()
            .map(row_to_goal)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(user_id, count = goals.len(), "loaded goals");
        Ok(goals)
    }

    async fn save(&self, user_id: &str, goals: &[Goal]) -> Result<(), RepositoryError> {
        let user_id = validate_user_id(user_id)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM goals WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for (position, goal) in goals.iter().enumerate() {
            sqlx::query(
                "INSERT INTO goals (user_id, position, name, target, created, deadline, saved_so_far)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(position as i64)
            .bind(&goal.name)
            .bind(decimal_to_text(goal.target))
            .bind(goal.created.format(DATE_FORMAT).to_string())
            .bind(goal.deadline.format(DATE_FORMAT).to_string())
            .bind(decimal_to_text(goal.saved_so_far))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(user_id, count = goals.len(), "saved goals");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT user_id FROM goals ORDER BY user_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get("user_id")
                    .map_err(|e| RepositoryError::Database(e.to_string()))
            })
            .collect()
    }
}

use async_trait::async_trait;

use budget_core::db::{DbConfig, GoalRepository, RepositoryError, RepositoryFactory};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`budget_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use budget_core::db::RepositoryRegistry;
/// use budget_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"budget.db"`. The file is created if it
    ///   does not exist.
    /// * A sqlx-style URL such as `"sqlite:budget.db?mode=rwc"`.
    /// * `":memory:"`, an ephemeral in-memory database.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn GoalRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use budget_core::Goal;
    use budget_core::db::RepositoryRegistry;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn registry_opens_migrated_memory_database() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(SqliteRepositoryFactory));

        let repo = registry
            .create(&DbConfig::default())
            .await
            .expect("create sqlite repository");

        let goals = vec![Goal {
            name: "Rent".to_string(),
            target: dec!(1200),
            created: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            deadline: NaiveDate::from_ymd_opt(2024, 1, 28).expect("valid date"),
            saved_so_far: dec!(0),
        }];
        repo.save("alice", &goals).await.expect("save");
        assert_eq!(repo.load("alice").await.expect("load"), goals);
    }

    #[tokio::test]
    async fn migrations_are_idempotent_on_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: dir.path().join("budget.db").to_string_lossy().to_string(),
        };

        let first = SqliteRepositoryFactory.create(&config).await.expect("first open");
        drop(first);
        let second = SqliteRepositoryFactory.create(&config).await;

        assert!(second.is_ok());
    }
}

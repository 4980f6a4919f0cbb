//! Start-up and health checks for the content database.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;

/// Tables the SEO admin and public pages read from
pub const REQUIRED_TABLES: [&str; 3] = ["seo_data", "redirects", "robots_settings"];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct DatabaseStatus {
    pub migrations_applied: usize,
    pub missing_tables: Vec<String>,
}

impl DatabaseStatus {
    pub fn is_ok(&self) -> bool {
        self.migrations_applied > 0 && self.missing_tables.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.migrations_applied == 0 {
            "Database not initialized - migrations need to be run".to_string()
        } else if !self.missing_tables.is_empty() {
            format!("Missing tables: {}", self.missing_tables.join(", "))
        } else {
            format!("Database OK - {} migrations applied", self.migrations_applied)
        }
    }
}

pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn validate(&self) -> Result<DatabaseStatus, DatabaseValidationError> {
        let migrations_table = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'",
        )
        .fetch_one(&self.pool)
        .await?
            > 0;

        let migrations_applied = if migrations_table {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
                .fetch_one(&self.pool)
                .await? as usize
        } else {
            0
        };

        let status = DatabaseStatus {
            migrations_applied,
            missing_tables: self.missing_tables(&REQUIRED_TABLES).await?,
        };

        if status.is_ok() {
            info!(migrations_applied, "Database validation complete");
        } else {
            warn!(summary = %status.summary(), "Database validation found problems");
        }
        Ok(status)
    }

    pub async fn missing_tables(&self, required: &[&str]) -> Result<Vec<String>, DatabaseValidationError> {
        let mut missing = Vec::new();
        for table in required {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=$1",
            )
            .bind(*table)
            .fetch_one(&self.pool)
            .await?
                > 0;
            if !exists {
                missing.push(table.to_string());
            }
        }
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    #[tokio::test]
    async fn migrated_database_is_ok() {
        let db = DBService::new_in_memory().await.unwrap();
        let status = DatabaseValidator::new(db.pool.clone()).validate().await.unwrap();
        assert!(status.is_ok(), "{}", status.summary());
        assert_eq!(status.migrations_applied, 3);
    }

    #[tokio::test]
    async fn empty_database_reports_everything_missing() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let status = DatabaseValidator::new(pool).validate().await.unwrap();
        assert!(!status.is_ok());
        assert_eq!(status.migrations_applied, 0);
        assert_eq!(status.missing_tables.len(), REQUIRED_TABLES.len());
        assert!(status.summary().contains("not initialized"));
    }
}

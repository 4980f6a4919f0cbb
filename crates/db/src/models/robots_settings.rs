use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// The admin-edited robots.txt body.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RobotsSettings {
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl RobotsSettings {
    pub async fn get(pool: &SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RobotsSettings>(
            "SELECT content, updated_at FROM robots_settings WHERE id = 1",
        )
        .fetch_optional(pool)
        .await
    }

    pub async fn save(pool: &SqlitePool, content: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RobotsSettings>(
            r#"INSERT INTO robots_settings (id, content)
               VALUES (1, $1)
               ON CONFLICT(id) DO UPDATE SET
                   content = excluded.content,
                   updated_at = datetime('now', 'subsec')
               RETURNING content, updated_at"#,
        )
        .bind(content)
        .fetch_one(pool)
        .await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A URL redirect managed from the admin console.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, TS)]
pub struct Redirect {
    pub id: Uuid,
    pub source_path: String,
    pub destination: String,
    pub status_code: u16,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_status_code() -> u16 {
    301
}

fn default_true() -> bool {
    true
}

/// Request body for creating or replacing a redirect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct CreateRedirect {
    pub source_path: String,
    pub destination: String,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Redirect {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"SELECT id, source_path, destination, status_code, is_active, created_at, updated_at
               FROM redirects
               ORDER BY source_path ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_all_active(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"SELECT id, source_path, destination, status_code, is_active, created_at, updated_at
               FROM redirects
               WHERE is_active = 1
               ORDER BY source_path ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"SELECT id, source_path, destination, status_code, is_active, created_at, updated_at
               FROM redirects
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_active_by_source(
        pool: &SqlitePool,
        source_path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"SELECT id, source_path, destination, status_code, is_active, created_at, updated_at
               FROM redirects
               WHERE source_path = $1 AND is_active = 1"#,
        )
        .bind(source_path)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateRedirect,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"INSERT INTO redirects (id, source_path, destination, status_code, is_active)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, source_path, destination, status_code, is_active, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.source_path)
        .bind(&data.destination)
        .bind(data.status_code)
        .bind(data.is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateRedirect,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Redirect>(
            r#"UPDATE redirects
               SET source_path = $2,
                   destination = $3,
                   status_code = $4,
                   is_active = $5,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, source_path, destination, status_code, is_active, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.source_path)
        .bind(&data.destination)
        .bind(data.status_code)
        .bind(data.is_active)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    fn draft(source: &str, destination: &str) -> CreateRedirect {
        CreateRedirect {
            source_path: source.to_string(),
            destination: destination.to_string(),
            status_code: 301,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn create_update_delete() {
        let db = DBService::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();

        let created = Redirect::create(&db.pool, id, &draft("/old", "/new")).await.unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.status_code, 301);

        let mut changed = draft("/old", "/newer");
        changed.status_code = 302;
        changed.is_active = false;
        let updated = Redirect::update(&db.pool, id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.destination, "/newer");
        assert_eq!(updated.status_code, 302);

        assert!(Redirect::find_active_by_source(&db.pool, "/old").await.unwrap().is_none());
        assert!(Redirect::find_all_active(&db.pool).await.unwrap().is_empty());
        assert_eq!(Redirect::find_all(&db.pool).await.unwrap().len(), 1);

        assert_eq!(Redirect::delete(&db.pool, id).await.unwrap(), 1);
        assert!(Redirect::find_by_id(&db.pool, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_source_is_rejected_by_schema() {
        let db = DBService::new_in_memory().await.unwrap();
        Redirect::create(&db.pool, Uuid::new_v4(), &draft("/a", "/b")).await.unwrap();
        let err = Redirect::create(&db.pool, Uuid::new_v4(), &draft("/a", "/c")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let db = DBService::new_in_memory().await.unwrap();
        let result = Redirect::update(&db.pool, Uuid::new_v4(), &draft("/a", "/b"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}

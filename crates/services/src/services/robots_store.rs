//! Serving and saving the site's robots.txt.

use db::models::robots_settings::RobotsSettings;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use super::robots::{self, RobotsConfig, RobotsValidation};

#[derive(Debug, Error)]
pub enum RobotsStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("robots.txt has {} errors", .0.errors.len())]
    Invalid(RobotsValidation),
}

pub struct RobotsStore {
    pool: SqlitePool,
    site_url: String,
}

impl RobotsStore {
    pub fn new(pool: SqlitePool, site_url: impl Into<String>) -> Self {
        Self {
            pool,
            site_url: site_url.into(),
        }
    }

    /// Saved robots.txt, or the generated site default.
    pub async fn current(&self) -> Result<String, RobotsStoreError> {
        Ok(match RobotsSettings::get(&self.pool).await? {
            Some(settings) => settings.content,
            None => robots::generate(&RobotsConfig::site_default(&self.site_url)),
        })
    }

    /// Save `content` if it has no errors. Warnings are returned alongside.
    pub async fn save(&self, content: &str) -> Result<RobotsValidation, RobotsStoreError> {
        let validation = robots::validate(content);
        if !validation.is_valid {
            return Err(RobotsStoreError::Invalid(validation));
        }

        let mut content = content.trim_end().to_string();
        content.push('\n');
        RobotsSettings::save(&self.pool, &content).await?;
        info!(
            bytes = content.len(),
            warnings = validation.warnings.len(),
            "Saved robots.txt"
        );
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    #[tokio::test]
    async fn falls_back_to_generated_default() {
        let db = DBService::new_in_memory().await.unwrap();
        let store = RobotsStore::new(db.pool.clone(), "https://acmespace.example");
        let text = store.current().await.unwrap();
        assert!(text.contains("Sitemap: https://acmespace.example/sitemap.xml"));
    }

    #[tokio::test]
    async fn save_rejects_errors_and_keeps_previous() {
        let db = DBService::new_in_memory().await.unwrap();
        let store = RobotsStore::new(db.pool.clone(), "https://acmespace.example");

        let validation = store.save("User-agent: *\nDisallow: /admin").await.unwrap();
        assert_eq!(validation.warnings.len(), 1);
        assert_eq!(store.current().await.unwrap(), "User-agent: *\nDisallow: /admin\n");

        let err = store.save("Disallow: /").await.unwrap_err();
        assert!(matches!(err, RobotsStoreError::Invalid(_)));
        assert_eq!(store.current().await.unwrap(), "User-agent: *\nDisallow: /admin\n");
    }
}

//! Load, validate and save page SEO metadata.

use db::models::seo_data::{SeoData, SeoRecord};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;

use super::{
    seo_meta::{self, ResolvedSocialMeta},
    seo_validator::{self, SeoRules, ValidationReport},
};

#[derive(Debug, Error)]
pub enum SeoServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("page_path is required")]
    MissingPagePath,
    #[error("no SEO metadata for {0}")]
    NotFound(String),
    #[error("{}", .0.summary())]
    Invalid(Box<ValidationReport>),
}

/// Stored record together with the report it passed
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SavedSeoData {
    pub record: SeoRecord,
    pub report: ValidationReport,
}

/// What a public page would emit for a given record
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SeoPreview {
    pub page_path: String,
    pub social: ResolvedSocialMeta,
    pub robots: String,
    pub canonical_url: String,
    pub head_html: String,
    pub report: ValidationReport,
}

pub struct SeoService {
    pool: SqlitePool,
    rules: SeoRules,
}

impl SeoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_rules(pool, SeoRules::default())
    }

    pub fn with_rules(pool: SqlitePool, rules: SeoRules) -> Self {
        Self { pool, rules }
    }

    pub fn evaluate(&self, data: &SeoData) -> ValidationReport {
        seo_validator::evaluate_with(data, &self.rules)
    }

    pub async fn list(&self) -> Result<Vec<SeoRecord>, SeoServiceError> {
        Ok(SeoRecord::find_all(&self.pool).await?)
    }

    pub async fn get(&self, page_path: &str) -> Result<SeoRecord, SeoServiceError> {
        let page_path = normalize_path(page_path)?;
        SeoRecord::find_by_page_path(&self.pool, &page_path)
            .await?
            .ok_or(SeoServiceError::NotFound(page_path))
    }

    /// Stored metadata, or a fresh default record when the page has none yet.
    pub async fn load_for_edit(&self, page_path: &str) -> Result<SeoData, SeoServiceError> {
        let page_path = normalize_path(page_path)?;
        Ok(SeoRecord::find_by_page_path(&self.pool, &page_path)
            .await?
            .map(|record| record.data)
            .unwrap_or_else(|| SeoData::new(page_path)))
    }

    /// Validate and upsert. Records with critical issues are not written.
    pub async fn save(&self, mut data: SeoData) -> Result<SavedSeoData, SeoServiceError> {
        data.page_path = normalize_path(&data.page_path)?;

        let report = self.evaluate(&data);
        if report.has_critical() {
            warn!(
                page_path = %data.page_path,
                score = report.score,
                issues = report.issues.len(),
                "Rejected SEO metadata with critical issues"
            );
            return Err(SeoServiceError::Invalid(Box::new(report)));
        }

        let record = SeoRecord::upsert(&self.pool, &data).await?;
        info!(
            page_path = %record.page_path,
            score = report.score,
            warnings = report.warnings.len(),
            suggestions = report.suggestions.len(),
            "Saved SEO metadata"
        );
        Ok(SavedSeoData { record, report })
    }

    pub async fn delete(&self, page_path: &str) -> Result<(), SeoServiceError> {
        let page_path = normalize_path(page_path)?;
        if SeoRecord::delete_by_page_path(&self.pool, &page_path).await? == 0 {
            return Err(SeoServiceError::NotFound(page_path));
        }
        info!(page_path = %page_path, "Deleted SEO metadata");
        Ok(())
    }

    pub async fn preview(&self, page_path: &str, site_url: &str) -> Result<SeoPreview, SeoServiceError> {
        let data = self.load_for_edit(page_path).await?;
        Ok(self.preview_data(&data, site_url))
    }

    pub fn preview_data(&self, data: &SeoData, site_url: &str) -> SeoPreview {
        SeoPreview {
            page_path: data.page_path.clone(),
            social: seo_meta::resolve_social(data, None),
            robots: seo_meta::robots_directive(data),
            canonical_url: seo_meta::canonical_url(data, site_url),
            head_html: seo_meta::render_head_tags(data, site_url),
            report: self.evaluate(data),
        }
    }
}

/// Trim and ensure a leading slash. Empty paths are rejected.
pub fn normalize_path(page_path: &str) -> Result<String, SeoServiceError> {
    let trimmed = page_path.trim();
    if trimmed.is_empty() {
        return Err(SeoServiceError::MissingPagePath);
    }
    Ok(if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    })
}

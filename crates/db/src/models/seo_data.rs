use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// Kind of page a metadata record belongs to. Informational only.
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "page_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PageType {
    Home,
    Inventory,
    Location,
    Industry,
    CaseStudy,
    City,
    #[default]
    Page,
}

fn default_true() -> bool {
    true
}

/// Search and social metadata for a single route.
///
/// Only `page_path` is required. Open Graph fields fall back to the `seo_*` fields and
/// Twitter fields fall back to Open Graph, never the other way round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct SeoData {
    pub page_path: String,
    #[serde(default)]
    pub page_type: PageType,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub focus_keyword: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    pub canonical_url: Option<String>,
    #[serde(default = "default_true")]
    pub robots_index: bool,
    #[serde(default = "default_true")]
    pub robots_follow: bool,
    #[serde(default)]
    pub robots_nosnippet: bool,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_image_alt: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub twitter_image_alt: Option<String>,
    pub structured_data_type: Option<String>,
    pub custom_json_ld: Option<String>,
}

impl SeoData {
    /// Fresh record for a page that has no stored metadata yet.
    pub fn new(page_path: impl Into<String>) -> Self {
        Self {
            page_path: page_path.into(),
            page_type: PageType::default(),
            seo_title: None,
            seo_description: None,
            focus_keyword: None,
            seo_keywords: Vec::new(),
            canonical_url: None,
            robots_index: true,
            robots_follow: true,
            robots_nosnippet: false,
            og_title: None,
            og_description: None,
            og_image: None,
            og_image_alt: None,
            twitter_title: None,
            twitter_description: None,
            twitter_image: None,
            twitter_image_alt: None,
            structured_data_type: None,
            custom_json_ld: None,
        }
    }

    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// Keywords with blank entries dropped, order preserved.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.seo_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }
}

/// Treats absent and blank strings alike.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A stored metadata record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SeoRecord {
    #[serde(flatten)]
    #[ts(flatten)]
    pub data: SeoData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::ops::Deref for SeoRecord {
    type Target = SeoData;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[derive(FromRow)]
struct SeoDataRow {
    page_path: String,
    page_type: PageType,
    seo_title: Option<String>,
    seo_description: Option<String>,
    focus_keyword: Option<String>,
    seo_keywords: String, // JSON array
    canonical_url: Option<String>,
    robots_index: bool,
    robots_follow: bool,
    robots_nosnippet: bool,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    og_image_alt: Option<String>,
    twitter_title: Option<String>,
    twitter_description: Option<String>,
    twitter_image: Option<String>,
    twitter_image_alt: Option<String>,
    structured_data_type: Option<String>,
    custom_json_ld: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SeoDataRow> for SeoRecord {
    fn from(row: SeoDataRow) -> Self {
        let seo_keywords = serde_json::from_str(&row.seo_keywords).unwrap_or_else(|e| {
            tracing::warn!(page_path = %row.page_path, error = %e, "Unreadable keyword list");
            Vec::new()
        });
        SeoRecord {
            data: SeoData {
                page_path: row.page_path,
                page_type: row.page_type,
                seo_title: row.seo_title,
                seo_description: row.seo_description,
                focus_keyword: row.focus_keyword,
                seo_keywords,
                canonical_url: row.canonical_url,
                robots_index: row.robots_index,
                robots_follow: row.robots_follow,
                robots_nosnippet: row.robots_nosnippet,
                og_title: row.og_title,
                og_description: row.og_description,
                og_image: row.og_image,
                og_image_alt: row.og_image_alt,
                twitter_title: row.twitter_title,
                twitter_description: row.twitter_description,
                twitter_image: row.twitter_image,
                twitter_image_alt: row.twitter_image_alt,
                structured_data_type: row.structured_data_type,
                custom_json_ld: row.custom_json_ld,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    page_path, page_type, seo_title, seo_description, focus_keyword, seo_keywords,
    canonical_url, robots_index, robots_follow, robots_nosnippet,
    og_title, og_description, og_image, og_image_alt,
    twitter_title, twitter_description, twitter_image, twitter_image_alt,
    structured_data_type, custom_json_ld, created_at, updated_at
"#;

impl SeoRecord {
    pub async fn find_by_page_path(
        pool: &SqlitePool,
        page_path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, SeoDataRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM seo_data WHERE page_path = $1"
        ))
        .bind(page_path)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SeoDataRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM seo_data ORDER BY page_path ASC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert or wholesale replace the record keyed by `page_path`.
    pub async fn upsert(pool: &SqlitePool, data: &SeoData) -> Result<Self, sqlx::Error> {
        let keywords = serde_json::to_string(&data.seo_keywords)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

        let row = sqlx::query_as::<_, SeoDataRow>(&format!(
            r#"INSERT INTO seo_data (
                page_path, page_type, seo_title, seo_description, focus_keyword, seo_keywords,
                canonical_url, robots_index, robots_follow, robots_nosnippet,
                og_title, og_description, og_image, og_image_alt,
                twitter_title, twitter_description, twitter_image, twitter_image_alt,
                structured_data_type, custom_json_ld
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ON CONFLICT(page_path) DO UPDATE SET
                page_type = excluded.page_type,
                seo_title = excluded.seo_title,
                seo_description = excluded.seo_description,
                focus_keyword = excluded.focus_keyword,
                seo_keywords = excluded.seo_keywords,
                canonical_url = excluded.canonical_url,
                robots_index = excluded.robots_index,
                robots_follow = excluded.robots_follow,
                robots_nosnippet = excluded.robots_nosnippet,
                og_title = excluded.og_title,
                og_description = excluded.og_description,
                og_image = excluded.og_image,
                og_image_alt = excluded.og_image_alt,
                twitter_title = excluded.twitter_title,
                twitter_description = excluded.twitter_description,
                twitter_image = excluded.twitter_image,
                twitter_image_alt = excluded.twitter_image_alt,
                structured_data_type = excluded.structured_data_type,
                custom_json_ld = excluded.custom_json_ld,
                updated_at = datetime('now', 'subsec')
            RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(&data.page_path)
        .bind(data.page_type)
        .bind(&data.seo_title)
        .bind(&data.seo_description)
        .bind(&data.focus_keyword)
        .bind(keywords)
        .bind(&data.canonical_url)
        .bind(data.robots_index)
        .bind(data.robots_follow)
        .bind(data.robots_nosnippet)
        .bind(&data.og_title)
        .bind(&data.og_description)
        .bind(&data.og_image)
        .bind(&data.og_image_alt)
        .bind(&data.twitter_title)
        .bind(&data.twitter_description)
        .bind(&data.twitter_image)
        .bind(&data.twitter_image_alt)
        .bind(&data.structured_data_type)
        .bind(&data.custom_json_ld)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn delete_by_page_path(pool: &SqlitePool, page_path: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seo_data WHERE page_path = $1")
            .bind(page_path)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

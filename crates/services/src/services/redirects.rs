//! Validation and resolution of admin-managed URL redirects.

use std::collections::{HashMap, HashSet};

use db::models::redirect::{CreateRedirect, Redirect};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::seo_validator::is_absolute_http_url;

/// Longest chain `resolve` will follow
pub const MAX_REDIRECT_HOPS: usize = 10;

pub const ALLOWED_STATUS_CODES: [u16; 4] = [301, 302, 307, 308];

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("redirect not found")]
    NotFound,
    #[error("invalid redirect: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Outcome of following redirects from a requested path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct ResolvedRedirect {
    pub destination: String,
    /// Status code of the first hop
    pub status_code: u16,
    pub hops: usize,
}

/// Check a draft against the rules and the redirects already stored.
///
/// `editing` is the id of the redirect being replaced, which is excluded from the
/// uniqueness and loop checks.
pub fn validate_redirect(
    draft: &CreateRedirect,
    existing: &[Redirect],
    editing: Option<Uuid>,
) -> Vec<String> {
    let mut errors = Vec::new();
    let source = draft.source_path.trim();
    let destination = draft.destination.trim();

    if !source.starts_with('/') {
        errors.push(format!("Source \"{}\" must start with /", source));
    }
    if !(destination.starts_with('/') || is_absolute_http_url(destination)) {
        errors.push(format!(
            "Destination \"{}\" must be a path starting with / or an absolute http(s) URL",
            destination
        ));
    }
    if !ALLOWED_STATUS_CODES.contains(&draft.status_code) {
        errors.push(format!(
            "Status code {} is not a redirect status (use 301, 302, 307 or 308)",
            draft.status_code
        ));
    }
    if source == destination {
        errors.push("Source and destination are the same".to_string());
    }

    let others = existing.iter().filter(|r| Some(r.id) != editing);
    if others.clone().any(|r| r.source_path == source) {
        errors.push(format!("A redirect for \"{}\" already exists", source));
    }

    if draft.is_active && source != destination {
        let active: HashMap<&str, &str> = others
            .filter(|r| r.is_active)
            .map(|r| (r.source_path.as_str(), r.destination.as_str()))
            .collect();
        let mut seen = HashSet::new();
        let mut next = destination;
        while let Some(&target) = active.get(next) {
            if target == source {
                errors.push(format!(
                    "Redirect would create a loop through \"{}\"",
                    next
                ));
                break;
            }
            if !seen.insert(next) {
                break;
            }
            next = target;
        }
    }

    errors
}

/// Follow active redirects from `path`. Returns `None` when no redirect applies.
pub fn resolve(path: &str, redirects: &[Redirect]) -> Option<ResolvedRedirect> {
    let active: HashMap<&str, &Redirect> = redirects
        .iter()
        .filter(|r| r.is_active)
        .map(|r| (r.source_path.as_str(), r))
        .collect();

    let first = active.get(path)?;
    let mut destination = first.destination.as_str();
    let mut hops = 1;
    while hops < MAX_REDIRECT_HOPS {
        match active.get(destination) {
            Some(next) if next.destination != path => {
                destination = next.destination.as_str();
                hops += 1;
            }
            _ => break,
        }
    }

    Some(ResolvedRedirect {
        destination: destination.to_string(),
        status_code: first.status_code,
        hops,
    })
}

fn normalized(data: CreateRedirect) -> CreateRedirect {
    CreateRedirect {
        source_path: data.source_path.trim().to_string(),
        destination: data.destination.trim().to_string(),
        ..data
    }
}

/// Validating front for redirect persistence
pub struct RedirectService {
    pool: SqlitePool,
}

impl RedirectService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Redirect>, RedirectError> {
        Ok(Redirect::find_all(&self.pool).await?)
    }

    pub async fn create(&self, data: CreateRedirect) -> Result<Redirect, RedirectError> {
        let data = normalized(data);
        let existing = Redirect::find_all(&self.pool).await?;
        let errors = validate_redirect(&data, &existing, None);
        if !errors.is_empty() {
            return Err(RedirectError::Invalid(errors));
        }

        let redirect = Redirect::create(&self.pool, Uuid::new_v4(), &data).await?;
        info!(
            redirect_id = %redirect.id,
            source = %redirect.source_path,
            destination = %redirect.destination,
            "Created redirect"
        );
        Ok(redirect)
    }

    pub async fn update(&self, id: Uuid, data: CreateRedirect) -> Result<Redirect, RedirectError> {
        let data = normalized(data);
        let existing = Redirect::find_all(&self.pool).await?;
        if !existing.iter().any(|r| r.id == id) {
            return Err(RedirectError::NotFound);
        }
        let errors = validate_redirect(&data, &existing, Some(id));
        if !errors.is_empty() {
            return Err(RedirectError::Invalid(errors));
        }

        let redirect = Redirect::update(&self.pool, id, &data)
            .await?
            .ok_or(RedirectError::NotFound)?;
        info!(redirect_id = %id, "Updated redirect");
        Ok(redirect)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RedirectError> {
        if Redirect::delete(&self.pool, id).await? == 0 {
            return Err(RedirectError::NotFound);
        }
        info!(redirect_id = %id, "Deleted redirect");
        Ok(())
    }

    pub async fn resolve(&self, path: &str) -> Result<Option<ResolvedRedirect>, RedirectError> {
        let active = Redirect::find_all_active(&self.pool).await?;
        Ok(resolve(path, &active))
    }
}

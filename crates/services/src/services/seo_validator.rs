//! Validation and scoring of page SEO metadata.
//!
//! The validator is a pure function of its input: it never fails, never touches the
//! database, and produces the same report for the same record. Admin screens call it on
//! every edit; the save path calls it again before persisting.

use db::models::seo_data::{SeoData, present};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;
use ts_rs::TS;
use url::Url;

/// Field a finding is attached to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SeoField {
    SeoTitle,
    SeoDescription,
    FocusKeyword,
    SeoKeywords,
    CanonicalUrl,
    OgImage,
    CustomJsonLd,
}

/// How serious a finding is. Only `Critical` blocks saving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct Finding {
    pub field: SeoField,
    pub severity: Severity,
    pub message: String,
}

/// Colour band the admin UI shows next to the score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreBand {
    Good,
    NeedsWork,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub score: u8,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub suggestions: Vec<Finding>,
}

impl ValidationReport {
    pub fn has_critical(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn score_band(&self) -> ScoreBand {
        match self.score {
            80..=100 => ScoreBand::Good,
            50..=79 => ScoreBand::NeedsWork,
            _ => ScoreBand::Poor,
        }
    }

    /// One-line description suitable for logs and toasts
    pub fn summary(&self) -> String {
        if self.has_critical() {
            let fields = self
                .issues
                .iter()
                .map(|f| f.field.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("SEO metadata invalid (score {}): fix {}", self.score, fields)
        } else if self.warnings.is_empty() && self.suggestions.is_empty() {
            format!("SEO metadata OK - score {}", self.score)
        } else {
            format!(
                "SEO metadata valid (score {}) with {} warnings and {} suggestions",
                self.score,
                self.warnings.len(),
                self.suggestions.len()
            )
        }
    }
}

/// Inclusive length bounds, counted in characters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// Thresholds and score penalties.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
pub struct SeoRules {
    pub title_length: LengthRange,
    pub description_length: LengthRange,
    pub keyword_count: LengthRange,
    critical_penalty: u8,
    warning_penalty: u8,
    suggestion_penalty: u8,
}

impl Default for SeoRules {
    fn default() -> Self {
        Self {
            title_length: LengthRange::new(30, 60),
            description_length: LengthRange::new(120, 160),
            keyword_count: LengthRange::new(3, 10),
            critical_penalty: 20,
            warning_penalty: 8,
            suggestion_penalty: 3,
        }
    }
}

impl SeoRules {
    /// Default thresholds with recalibrated penalties. `None` unless
    /// critical > warning > suggestion.
    pub fn with_penalties(critical: u8, warning: u8, suggestion: u8) -> Option<Self> {
        (critical > warning && warning > suggestion).then(|| Self {
            critical_penalty: critical,
            warning_penalty: warning,
            suggestion_penalty: suggestion,
            ..Self::default()
        })
    }

    pub fn penalties(&self) -> (u8, u8, u8) {
        (
            self.critical_penalty,
            self.warning_penalty,
            self.suggestion_penalty,
        )
    }

    fn penalty(&self, severity: Severity) -> u32 {
        u32::from(match severity {
            Severity::Critical => self.critical_penalty,
            Severity::Warning => self.warning_penalty,
            Severity::Suggestion => self.suggestion_penalty,
        })
    }
}

/// Evaluate `data` against the default rules.
pub fn evaluate(data: &SeoData) -> ValidationReport {
    evaluate_with(data, &SeoRules::default())
}

pub fn evaluate_with(data: &SeoData, rules: &SeoRules) -> ValidationReport {
    let mut findings = Vec::new();

    check_length(
        &mut findings,
        SeoField::SeoTitle,
        "Title",
        &data.seo_title,
        rules.title_length,
    );
    check_length(
        &mut findings,
        SeoField::SeoDescription,
        "Meta description",
        &data.seo_description,
        rules.description_length,
    );

    if present(&data.focus_keyword).is_none() {
        findings.push(finding(
            SeoField::FocusKeyword,
            Severity::Suggestion,
            "Add a focus keyword to target in the title and description".to_string(),
        ));
    }

    let keyword_count = data.keywords().count();
    if keyword_count < rules.keyword_count.min {
        findings.push(finding(
            SeoField::SeoKeywords,
            Severity::Suggestion,
            format!(
                "Only {} keywords; add at least {}",
                keyword_count, rules.keyword_count.min
            ),
        ));
    } else if keyword_count > rules.keyword_count.max {
        findings.push(finding(
            SeoField::SeoKeywords,
            Severity::Suggestion,
            format!(
                "{} keywords; keep it to {} or fewer",
                keyword_count, rules.keyword_count.max
            ),
        ));
    }

    match present(&data.canonical_url) {
        None => findings.push(finding(
            SeoField::CanonicalUrl,
            Severity::Suggestion,
            "Set a canonical URL to avoid duplicate-content penalties".to_string(),
        )),
        Some(url) if !is_absolute_url(url) => findings.push(finding(
            SeoField::CanonicalUrl,
            Severity::Warning,
            format!("Canonical URL \"{}\" is not an absolute URL", url.trim()),
        )),
        Some(_) => {}
    }

    if present(&data.og_image).is_none() {
        findings.push(finding(
            SeoField::OgImage,
            Severity::Suggestion,
            "Add an Open Graph image for social sharing".to_string(),
        ));
    }

    if let Some(json_ld) = present(&data.custom_json_ld)
        && let Err(e) = serde_json::from_str::<serde_json::Value>(json_ld)
    {
        findings.push(finding(
            SeoField::CustomJsonLd,
            Severity::Critical,
            format!("Custom JSON-LD is not valid JSON: {}", e),
        ));
    }

    let report = build_report(findings, rules);
    debug!(
        page_path = %data.page_path,
        score = report.score,
        issues = report.issues.len(),
        warnings = report.warnings.len(),
        suggestions = report.suggestions.len(),
        "Evaluated SEO metadata"
    );
    report
}

/// True for any absolute URL, i.e. one that starts with a scheme.
pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok()
}

/// True for absolute http(s) URLs with a host.
pub fn is_absolute_http_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn finding(field: SeoField, severity: Severity, message: String) -> Finding {
    Finding {
        field,
        severity,
        message,
    }
}

fn check_length(
    findings: &mut Vec<Finding>,
    field: SeoField,
    label: &str,
    value: &Option<String>,
    range: LengthRange,
) {
    let Some(text) = present(value) else {
        findings.push(finding(
            field,
            Severity::Critical,
            format!("{} is required", label),
        ));
        return;
    };

    let len = text.chars().count();
    if len < range.min {
        findings.push(finding(
            field,
            Severity::Warning,
            format!(
                "{} is too short ({} characters); aim for {}-{}",
                label, len, range.min, range.max
            ),
        ));
    } else if len > range.max {
        findings.push(finding(
            field,
            Severity::Warning,
            format!(
                "{} is too long ({} characters); search engines truncate after about {}",
                label, len, range.max
            ),
        ));
    }
}

fn build_report(findings: Vec<Finding>, rules: &SeoRules) -> ValidationReport {
    let penalty: u32 = findings.iter().map(|f| rules.penalty(f.severity)).sum();
    let score = 100u32.saturating_sub(penalty).min(100) as u8;

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();
    for f in findings {
        match f.severity {
            Severity::Critical => issues.push(f),
            Severity::Warning => warnings.push(f),
            Severity::Suggestion => suggestions.push(f),
        }
    }

    ValidationReport {
        is_valid: issues.is_empty(),
        score,
        issues,
        warnings,
        suggestions,
    }
}

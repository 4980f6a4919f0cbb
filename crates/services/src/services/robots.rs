//! robots.txt generation and validation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::seo_validator::is_absolute_http_url;

/// One `User-agent` group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct RobotsRule {
    pub user_agent: String,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub disallow: Vec<String>,
    pub crawl_delay: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct RobotsConfig {
    pub rules: Vec<RobotsRule>,
    #[serde(default)]
    pub sitemaps: Vec<String>,
}

impl RobotsConfig {
    /// Rules served when nothing has been saved from the admin console.
    pub fn site_default(site_url: &str) -> Self {
        let site_url = site_url.trim_end_matches('/');
        Self {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: vec!["/admin".to_string(), "/api/".to_string()],
                crawl_delay: None,
            }],
            sitemaps: vec![format!("{}/sitemap.xml", site_url)],
        }
    }
}

/// Assemble robots.txt text from `config`.
pub fn generate(config: &RobotsConfig) -> String {
    let mut blocks = Vec::with_capacity(config.rules.len() + 1);

    for rule in &config.rules {
        let mut lines = vec![format!("User-agent: {}", rule.user_agent.trim())];
        lines.extend(rule.allow.iter().map(|path| format!("Allow: {}", path.trim())));
        lines.extend(
            rule.disallow
                .iter()
                .map(|path| format!("Disallow: {}", path.trim())),
        );
        if let Some(delay) = rule.crawl_delay {
            lines.push(format!("Crawl-delay: {}", delay));
        }
        blocks.push(lines.join("\n"));
    }

    if !config.sitemaps.is_empty() {
        blocks.push(
            config
                .sitemaps
                .iter()
                .map(|url| format!("Sitemap: {}", url.trim()))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct RobotsProblem {
    /// 1-based; `None` for problems with the file as a whole.
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct RobotsValidation {
    pub is_valid: bool,
    pub errors: Vec<RobotsProblem>,
    pub warnings: Vec<RobotsProblem>,
}

fn problem(line: Option<usize>, message: impl Into<String>) -> RobotsProblem {
    RobotsProblem {
        line,
        message: message.into(),
    }
}

/// Line-by-line check of robots.txt text.
pub fn validate(text: &str) -> RobotsValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut current_agents: Vec<String> = Vec::new();
    let mut in_agent_list = false;
    let mut groups = 0usize;
    let mut sitemaps = 0usize;
    let mut blocks_everything = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = Some(idx + 1);
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let Some((directive, value)) = line.split_once(':') else {
            errors.push(problem(line_no, format!("Expected \"Directive: value\", got \"{}\"", line)));
            continue;
        };
        let value = value.trim();

        match directive.trim().to_ascii_lowercase().as_str() {
            "user-agent" => {
                if value.is_empty() {
                    errors.push(problem(line_no, "User-agent needs a value"));
                }
                if !in_agent_list {
                    current_agents.clear();
                    groups += 1;
                }
                current_agents.push(value.to_string());
                in_agent_list = true;
            }
            directive @ ("allow" | "disallow") => {
                in_agent_list = false;
                if current_agents.is_empty() {
                    errors.push(problem(
                        line_no,
                        format!("{} appears before any User-agent", capitalize(directive)),
                    ));
                    continue;
                }
                if !value.is_empty() && !value.starts_with('/') && !value.starts_with('*') {
                    warnings.push(problem(
                        line_no,
                        format!("Path \"{}\" should start with / or *", value),
                    ));
                }
                if directive == "disallow" && value == "/" && current_agents.iter().any(|a| a == "*")
                {
                    blocks_everything = true;
                }
            }
            "crawl-delay" => {
                in_agent_list = false;
                if current_agents.is_empty() {
                    errors.push(problem(line_no, "Crawl-delay appears before any User-agent"));
                } else if value.parse::<f64>().map(|d| d < 0.0).unwrap_or(true) {
                    errors.push(problem(
                        line_no,
                        format!("Crawl-delay must be a non-negative number, got \"{}\"", value),
                    ));
                }
            }
            "sitemap" => {
                sitemaps += 1;
                if !is_absolute_http_url(value) {
                    errors.push(problem(
                        line_no,
                        format!("Sitemap must be an absolute URL, got \"{}\"", value),
                    ));
                }
            }
            "host" | "clean-param" => {}
            other => warnings.push(problem(line_no, format!("Unknown directive \"{}\"", other))),
        }
    }

    if groups == 0 {
        errors.push(problem(None, "No User-agent group found"));
    }
    if sitemaps == 0 {
        warnings.push(problem(None, "No Sitemap declared"));
    }
    if blocks_everything {
        warnings.push(problem(
            None,
            "\"Disallow: /\" for all user agents blocks the whole site from search engines",
        ));
    }

    RobotsValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

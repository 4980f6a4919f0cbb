use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Public origin of the marketing site, used for canonical URLs and sitemaps.
    pub site_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            database_url: "sqlite://site.db?mode=rwc".to_string(),
            site_url: "http://localhost:3001".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            Err(_) => defaults.port,
        };

        let site_url = std::env::var("SITE_URL").unwrap_or(defaults.site_url);
        if !site_url.starts_with("http://") && !site_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "SITE_URL",
                value: site_url,
            });
        }

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            site_url: site_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::models::FilenameTemplate;
use crate::services::resolver::{ResolutionStrategy, ResolverSettings};

/// Built-in defaults. Every value can be overridden from the environment.
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8080;
    pub const STORAGE_BASE_URL: &str = "https://horaeng.com/storage/";
    pub const DEFAULT_DOC_TYPE: &str = "문제";
    pub const STRATEGY: &str = "concurrent";
    pub const FETCH_TIMEOUT_SECS: u64 = 20;
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const MAX_CONCURRENT_FETCHES: usize = 12;

    /// Filename conventions observed on the storage host, most common first.
    pub const TEMPLATES: &[&str] = &[
        "{year}년-고{grade}-{month}월-모의고사-{subject}-{docType}.pdf",
        "{year}년-{month}월-고{grade}-모의고사-{subject}-{docType}.pdf",
        "{year}학년도-{month}월-모의평가-{subject}-{docType}.pdf",
        "{year}년-{month}월-모의평가-{subject}-{docType}.pdf",
        "{year}학년도-대수능-{month}월-모의평가-{subject}-{docType}.pdf",
        "{year}학년도-{month}월-고3-모의고사-{subject}-{docType}.pdf",
        "{year}년-고3-{month}월-모의고사-화법과작문-{docType}.pdf",
        "{year}년-{month}월_고3_{subject}-1.pdf",
        "{year}년-고3-{month}월_{subject}-{docType}.pdf",
        "{year}학년도-{month}월-고3-{subject}-{docType}.pdf",
        "{year}_{month}-고3-{subject}영역-문제지.pdf",
        "{year}_{month}-고3-{subject}영역-정답-및-해설.pdf",
    ];
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Outbound HTTP client settings for upstream fetches.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Total time allowed for one candidate fetch, body included.
    pub timeout: Duration,
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Resolver behaviour (base URL, templates, strategy)
    pub resolver: ResolverSettings,
    /// Upstream HTTP client timeouts
    pub fetch: FetchSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `RUST_ENV` is required; everything else falls back to
    /// [`defaults`].
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `PDF_HOST`: Server host (default: 127.0.0.1)
    /// - `PDF_PORT`: Server port (default: 8080)
    /// - `PDF_STORAGE_BASE_URL`: Upstream storage URL prefix
    /// - `PDF_DEFAULT_DOC_TYPE`: Document type used when `type` is omitted (default: 문제)
    /// - `PDF_STRATEGY`: single | sequential | concurrent (default: concurrent)
    /// - `PDF_TEMPLATES`: `|`-separated filename templates replacing the built-in list
    /// - `PDF_FETCH_TIMEOUT_SECS`: Per-fetch total timeout (default: 20)
    /// - `PDF_CONNECT_TIMEOUT_SECS`: Per-fetch connect timeout (default: 5)
    /// - `PDF_MAX_CONCURRENT_FETCHES`: Fan-out cap for the concurrent strategy (default: 12)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("PDF_HOST").unwrap_or_else(|_| defaults::HOST.to_string());

        let port = env::var("PDF_PORT")
            .unwrap_or_else(|_| defaults::PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PDF_PORT must be a valid port number"))?;

        let base_url = normalize_base_url(
            &env::var("PDF_STORAGE_BASE_URL")
                .unwrap_or_else(|_| defaults::STORAGE_BASE_URL.to_string()),
        );

        let default_doc_type = env::var("PDF_DEFAULT_DOC_TYPE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults::DEFAULT_DOC_TYPE.to_string());

        let strategy = ResolutionStrategy::parse(
            &env::var("PDF_STRATEGY").unwrap_or_else(|_| defaults::STRATEGY.to_string()),
        )
        .ok_or(ConfigError::InvalidValue(
            "PDF_STRATEGY must be 'single', 'sequential' or 'concurrent'",
        ))?;

        let templates = match env::var("PDF_TEMPLATES") {
            Ok(raw) => parse_templates(&raw)?,
            Err(_) => default_templates(),
        };

        let fetch_timeout_secs = env::var("PDF_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::FETCH_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("PDF_FETCH_TIMEOUT_SECS must be a valid number"))?;

        let connect_timeout_secs = env::var("PDF_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("PDF_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;

        let max_concurrent_fetches = env::var("PDF_MAX_CONCURRENT_FETCHES")
            .unwrap_or_else(|_| defaults::MAX_CONCURRENT_FETCHES.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("PDF_MAX_CONCURRENT_FETCHES must be a valid number")
            })?;

        let config = Config {
            environment,
            host,
            port,
            resolver: ResolverSettings {
                base_url,
                templates,
                default_doc_type,
                strategy,
                max_concurrent_fetches,
            },
            fetch: FetchSettings {
                timeout: Duration::from_secs(fetch_timeout_secs),
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Check invariants that hold in every environment, plus the stricter
    /// production rules.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue(
                "PDF_MAX_CONCURRENT_FETCHES must be at least 1",
            ));
        }

        if self.resolver.templates.is_empty() {
            return Err(ConfigError::InvalidValue(
                "PDF_TEMPLATES must contain at least one template",
            ));
        }

        if self.fetch.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "PDF_FETCH_TIMEOUT_SECS must be greater than zero",
            ));
        }

        if self.environment.is_production() {
            self.validate_production()?;
        }

        Ok(())
    }

    /// Production must not talk to the storage host over plain HTTP.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.resolver.base_url.starts_with("https://") {
            errors.push(format!(
                "PDF_STORAGE_BASE_URL '{}' must use https in production.",
                self.resolver.base_url
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// The built-in template list.
pub fn default_templates() -> Vec<FilenameTemplate> {
    defaults::TEMPLATES
        .iter()
        .map(|t| FilenameTemplate::new(*t))
        .collect()
}

/// Parse a `|`-separated template override, rejecting malformed entries.
fn parse_templates(raw: &str) -> Result<Vec<FilenameTemplate>, ConfigError> {
    raw.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            FilenameTemplate::parse(t)
                .map_err(|reason| ConfigError::InvalidTemplate(t.to_string(), reason))
        })
        .collect()
}

/// Ensure the base URL ends with exactly one `/` so filenames append cleanly.
fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Invalid filename template '{0}': {1}")]
    InvalidTemplate(String, String),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}

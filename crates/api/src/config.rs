//! Server configuration loaded from environment variables.

use std::time::Duration;

use easel_genai::GenAiConfig;

/// All fields have defaults suitable for local development except the
/// generation API key, which must be set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `75`; must exceed the
    /// upstream generation timeout so upstream timeouts surface as 504s
    /// from our handler, not as middleware 408s).
    pub request_timeout_secs: u64,
    /// Graceful shutdown drain period in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum request body size in megabytes (default: `50`; base64
    /// image payloads are large).
    pub body_limit_mb: usize,
    /// Upstream generation API settings.
    pub genai: GenAiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                      |
    /// |-------------------------|----------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                    |
    /// | `PORT`                  | `3000`                                       |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                      |
    /// | `REQUEST_TIMEOUT_SECS`  | `75`                                         |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                         |
    /// | `BODY_LIMIT_MB`         | `50`                                         |
    /// | `GENAI_API_URL`         | `https://generativelanguage.googleapis.com`  |
    /// | `GENAI_API_KEY`         | (required)                                   |
    /// | `GENAI_TIMEOUT_SECS`    | `60`                                         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "75".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let body_limit_mb: usize = std::env::var("BODY_LIMIT_MB")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("BODY_LIMIT_MB must be a valid usize");

        let genai = GenAiConfig {
            api_url: std::env::var("GENAI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            api_key: std::env::var("GENAI_API_KEY").expect("GENAI_API_KEY must be set"),
            timeout: Duration::from_secs(
                std::env::var("GENAI_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".into())
                    .parse()
                    .expect("GENAI_TIMEOUT_SECS must be a valid u64"),
            ),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            body_limit_mb,
            genai,
        }
    }
}

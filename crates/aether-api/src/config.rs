//! API configuration.
//!
//! The service answers a slideshow display on the same host or LAN, so the
//! defaults are tuned for a handful of clients: analysis routes are the only
//! expensive ones (each may decode dozens of images), which is why they get a
//! per-client rate limit while reads of the cached theme do not.

/// Default analysis requests per second per client.
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;

/// Default burst on top of the steady rate; a display refreshing several
/// collections at start-up fits inside it.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Request bodies are small JSON documents (a path and two options).
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
    /// Requests per second per client on the analysis routes.
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
    pub max_body_size: usize,
    /// `production` hides internal error details from responses.
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: DEFAULT_RATE_LIMIT_RPS,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables, falling back to [`Default`]
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .ok()
                .map(|s| parse_origins(&s))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS")
                .filter(|&rps| rps > 0)
                .unwrap_or(defaults.rate_limit_rps),
            rate_limit_burst: env_parse("RATE_LIMIT_BURST")
                .filter(|&burst| burst > 0)
                .unwrap_or(defaults.rate_limit_burst),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Comma separated origins, blanks dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

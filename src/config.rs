// src/config.rs
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    pub reports_dir: PathBuf,
    /// Public base used when building download links.
    pub base_url: String,
    pub zillow_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_reasoning_model: String,
    pub search_radius_miles: f64,
    pub max_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_path: "comp_appraiser.sqlite3".to_string(),
            reports_dir: PathBuf::from("reports"),
            base_url: "http://127.0.0.1:8000".to_string(),
            zillow_api_key: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_reasoning_model: "o3-mini".to_string(),
            search_radius_miles: 1.0,
            max_workers: 8,
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match non_empty("BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid BIND_ADDR {raw:?}: {e}");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let base_url = non_empty("BASE_URL").unwrap_or_else(|| format!("http://{bind_addr}"));

        Self {
            bind_addr,
            database_path: non_empty("DATABASE_PATH").unwrap_or(defaults.database_path),
            reports_dir: non_empty("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            base_url: base_url.trim_end_matches('/').to_string(),
            zillow_api_key: non_empty("ZILLOW_KEY"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_reasoning_model: non_empty("OPENAI_REASONING_MODEL")
                .unwrap_or(defaults.openai_reasoning_model),
            search_radius_miles: non_empty("SEARCH_RADIUS_MILES")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|r| *r > 0.0)
                .unwrap_or(defaults.search_radius_miles),
            max_workers: non_empty("MAX_WORKERS")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_workers),
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use blog_admin_client::{ClientConfig, DEFAULT_API_URL, DEFAULT_GITHUB_API_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub github_api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub autosave_interval_secs: u64,
    pub token_file: PathBuf,
    pub github_token_file: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_url = get_or("BLOG_ADMIN_API_URL", DEFAULT_API_URL);
        let github_api_url = get_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL);
        let connect_timeout_secs = parse_u64_env("HTTP_CONNECT_TIMEOUT_SECS", 5)?;
        let request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 15)?;
        let autosave_interval_secs = parse_u64_env("AUTOSAVE_INTERVAL_SECS", 30)?;
        let token_file = PathBuf::from(get_or("BLOG_ADMIN_TOKEN_FILE", ".blog_admin_token"));
        let github_token_file = PathBuf::from(get_or("GITHUB_TOKEN_FILE", ".github_token"));
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            api_url: normalize_server(api_url),
            github_api_url: normalize_server(github_api_url),
            connect_timeout_secs,
            request_timeout_secs,
            autosave_interval_secs,
            token_file,
            github_token_file,
            log_level,
        })
    }

    /// Флаги `--server` и `--github-api` перекрывают переменные окружения.
    pub fn with_overrides(mut self, server: Option<String>, github_api: Option<String>) -> Self {
        if let Some(server) = server {
            self.api_url = normalize_server(server);
        }
        if let Some(github_api) = github_api {
            self.github_api_url = normalize_server(github_api);
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_url.clone(),
            github_api_url: self.github_api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientConfig::default()
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

fn get_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn normalize_server(server: String) -> String {
    let server = server.trim().trim_end_matches('/').to_string();
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_positive(key, &raw)
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    let value = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        Settings {
            api_url: DEFAULT_API_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
            autosave_interval_secs: 30,
            token_file: PathBuf::from(".blog_admin_token"),
            github_token_file: PathBuf::from(".github_token"),
            log_level: "warn".to_string(),
        }
    }

    #[test]
    fn normalize_server_keeps_scheme() {
        assert_eq!(
            normalize_server("https://example.com/api/".to_string()),
            "https://example.com/api"
        );
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        assert_eq!(
            normalize_server("localhost:9999/api".to_string()),
            "http://localhost:9999/api"
        );
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert_eq!(parse_positive("X", " 12 ").expect("valid"), 12);
        assert!(parse_positive("X", "0").is_err());
        assert!(parse_positive("X", "-1").is_err());
        assert!(parse_positive("X", "abc").is_err());
    }

    #[test]
    fn overrides_replace_urls() {
        let settings = defaults().with_overrides(Some("10.0.0.1:8080/api".to_string()), None);
        assert_eq!(settings.api_url, "http://10.0.0.1:8080/api");
        assert_eq!(settings.github_api_url, DEFAULT_GITHUB_API_URL);
    }

    #[test]
    fn client_config_carries_timeouts() {
        let config = defaults().client_config();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(defaults().autosave_interval(), Duration::from_secs(30));
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use site_scanner::types::config::DEFAULT_USER_AGENT;
use site_scanner::ScanConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub scan_concurrency: usize,
    pub scan_timeout_secs: u64,
    pub scan_max_redirects: usize,
    pub scan_user_agent: String,
    /// Cap on domains accepted by `POST /bulk-analyze`
    pub bulk_analyze_max_domains: usize,
    /// Cap on domains accepted by `POST /batch-scan`
    pub batch_scan_max_domains: usize,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: parse_var("PORT", 3000).context("PORT must be a valid number")?,
            scan_concurrency: parse_var("SCAN_CONCURRENCY", 5)
                .context("SCAN_CONCURRENCY must be a valid number")?,
            scan_timeout_secs: parse_var("SCAN_TIMEOUT_SECS", 8)
                .context("SCAN_TIMEOUT_SECS must be a valid number")?,
            scan_max_redirects: parse_var("SCAN_MAX_REDIRECTS", 5)
                .context("SCAN_MAX_REDIRECTS must be a valid number")?,
            scan_user_agent: env::var("SCAN_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            bulk_analyze_max_domains: parse_var("BULK_ANALYZE_MAX_DOMAINS", 50)
                .context("BULK_ANALYZE_MAX_DOMAINS must be a valid number")?,
            batch_scan_max_domains: parse_var("BATCH_SCAN_MAX_DOMAINS", 5)
                .context("BATCH_SCAN_MAX_DOMAINS must be a valid number")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }

    /// Scanner settings derived from this configuration
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_concurrency(self.scan_concurrency)
            .with_timeout(Duration::from_secs(self.scan_timeout_secs))
            .with_max_redirects(self.scan_max_redirects)
            .with_user_agent(self.scan_user_agent.clone())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.com, https://b.com,,"),
            vec!["https://a.com", "https://b.com"]
        );
        assert!(parse_origins("  ").is_empty());
    }

    #[test]
    fn test_scan_config_mapping() {
        let config = Config {
            port: 3000,
            scan_concurrency: 7,
            scan_timeout_secs: 3,
            scan_max_redirects: 2,
            scan_user_agent: "Agent/1.0".to_string(),
            bulk_analyze_max_domains: 50,
            batch_scan_max_domains: 5,
            allowed_origins: vec![],
        };
        let scan = config.scan_config();
        assert_eq!(scan.concurrency, 7);
        assert_eq!(scan.request_timeout, Duration::from_secs(3));
        assert_eq!(scan.max_redirects, 2);
        assert_eq!(scan.user_agent, "Agent/1.0");
    }
}

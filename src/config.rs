use std::{env, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://api-dollar-0f0i.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads `MONITOR_API_URL` and `MONITOR_TIMEOUT_SECS`, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            env::var("MONITOR_API_URL").ok(),
            env::var("MONITOR_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(api_url: Option<String>, timeout_secs: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(api_url) = api_url.filter(|url| !url.trim().is_empty()) {
            config.api_url = api_url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = timeout_secs {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("MONITOR_TIMEOUT_SECS is not a number: {secs}"))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_from_vars() {
        let config =
            Config::from_vars(Some("http://localhost:3000/".into()), Some(" 3 ".into())).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(Config::from_vars(None, Some("ten".into())).is_err());
    }
}

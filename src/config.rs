use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::meter::MeterThresholds;

#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Listen host address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Root URL of the upstream account API
    pub api_root: String,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Quota percentage at which the meter switches to warning styling
    pub warn_at_percent: f64,

    /// Quota percentage at which the meter switches to danger styling
    pub error_at_percent: f64,

    /// User id the quota model is bound to, when known at startup
    pub user_id: Option<String>,

    /// Log level
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8186,
            api_root: "http://127.0.0.1:8080/api".to_string(),
            request_timeout_secs: 30,
            warn_at_percent: 85.0,
            error_at_percent: 100.0,
            user_id: None,
            log_level: "info".to_string(),
        }
    }
}

impl PanelConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("PANEL_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = env::var("PANEL_PORT") {
            cfg.port = port.parse().context("PANEL_PORT must be a valid u16")?;
        }
        if let Ok(root) = env::var("API_ROOT") {
            cfg.api_root = root;
        }
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout_secs = timeout
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a positive integer")?;
        }
        if let Ok(warn) = env::var("QUOTA_WARN_PERCENT") {
            cfg.warn_at_percent = warn
                .parse()
                .context("QUOTA_WARN_PERCENT must be a number")?;
        }
        if let Ok(error) = env::var("QUOTA_ERROR_PERCENT") {
            cfg.error_at_percent = error
                .parse()
                .context("QUOTA_ERROR_PERCENT must be a number")?;
        }
        if let Ok(id) = env::var("PANEL_USER_ID") {
            if !id.trim().is_empty() {
                cfg.user_id = Some(id);
            }
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            cfg.log_level = level;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_root.trim().is_empty() {
            anyhow::bail!("API_ROOT cannot be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if self.warn_at_percent < 0.0 {
            anyhow::bail!("QUOTA_WARN_PERCENT must not be negative");
        }
        if self.error_at_percent < self.warn_at_percent {
            anyhow::bail!("QUOTA_ERROR_PERCENT must not be below QUOTA_WARN_PERCENT");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn thresholds(&self) -> MeterThresholds {
        MeterThresholds {
            warn_at_percent: self.warn_at_percent,
            error_at_percent: self.error_at_percent,
        }
    }
}

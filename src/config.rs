//! Process configuration
//!
//! Provider credentials and endpoints are read once from the environment at
//! startup and handed to the aggregator and the insight client explicitly.
//! A missing API key disables the matching provider; it never fails startup.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::constants::{
    AIRNOW_API_BASE, GEMINI_API_BASE, GEMINI_MODEL, OPENAQ_API_BASE, OPEN_METEO_API_BASE,
    WAQI_API_BASE, WAQI_DEMO_TOKEN,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// AirNow API key; AirNow is skipped without it
    #[serde(default)]
    pub airnow_api_key: Option<String>,
    /// Gemini API key; the insight endpoint answers 500 without it
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// AQICN token
    #[serde(default = "default_waqi_token")]
    pub waqi_token: String,
    /// Socket address for the HTTP server
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Directory holding the prebuilt frontend
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
    /// Per-call timeout for data providers
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    /// Per-call timeout for the insight provider
    #[serde(default = "default_insight_timeout")]
    pub insight_timeout_secs: u64,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_airnow_base_url")]
    pub airnow_base_url: String,
    #[serde(default = "default_openaq_base_url")]
    pub openaq_base_url: String,
    #[serde(default = "default_waqi_base_url")]
    pub waqi_base_url: String,
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
}

fn default_waqi_token() -> String {
    WAQI_DEMO_TOKEN.to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

const fn default_provider_timeout() -> u64 {
    10
}

const fn default_insight_timeout() -> u64 {
    30
}

fn default_gemini_model() -> String {
    GEMINI_MODEL.to_string()
}

fn default_airnow_base_url() -> String {
    AIRNOW_API_BASE.to_string()
}

fn default_openaq_base_url() -> String {
    OPENAQ_API_BASE.to_string()
}

fn default_waqi_base_url() -> String {
    WAQI_API_BASE.to_string()
}

fn default_open_meteo_base_url() -> String {
    OPEN_METEO_API_BASE.to_string()
}

fn default_gemini_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            airnow_api_key: None,
            gemini_api_key: None,
            waqi_token: default_waqi_token(),
            listen_addr: default_listen_addr(),
            frontend_dir: default_frontend_dir(),
            provider_timeout_secs: default_provider_timeout(),
            insight_timeout_secs: default_insight_timeout(),
            gemini_model: default_gemini_model(),
            airnow_base_url: default_airnow_base_url(),
            openaq_base_url: default_openaq_base_url(),
            waqi_base_url: default_waqi_base_url(),
            open_meteo_base_url: default_open_meteo_base_url(),
            gemini_base_url: default_gemini_base_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::default())
    }

    /// Load configuration from an environment source. Tests hand in a
    /// source backed by a fixed map.
    pub fn from_environment(environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Blank keys count as absent
    pub fn normalize(&mut self) {
        for key in [&mut self.airnow_api_key, &mut self.gemini_api_key] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
        if self.waqi_token.trim().is_empty() {
            self.waqi_token = default_waqi_token();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider_timeout_secs == 0 || self.insight_timeout_secs == 0 {
            anyhow::bail!("Provider timeouts must be greater than zero");
        }

        let base_urls = [
            ("airnow_base_url", &self.airnow_base_url),
            ("openaq_base_url", &self.openaq_base_url),
            ("waqi_base_url", &self.waqi_base_url),
            ("open_meteo_base_url", &self.open_meteo_base_url),
            ("gemini_base_url", &self.gemini_base_url),
        ];
        for (name, url) in base_urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{name} must be a valid HTTP or HTTPS URL, got '{url}'");
            }
        }

        Ok(())
    }
}

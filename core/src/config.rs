use crate::error::{EditError, Result};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "TAGPATCH_BASE_URL";
pub const ENV_MODEL: &str = "TAGPATCH_MODEL";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub verbose: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: false,
        }
    }

    /// Defaults overlaid with whatever the environment provides.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(key) = env::var(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Ok(url) = env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(model) = env::var(ENV_MODEL) {
            config.model = model;
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(invalid("api_key", "<empty>", &format!("set {ENV_API_KEY}")));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "<empty>", "must name a model"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid("base_url", &self.base_url, "must be an http(s) URL"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(
                "temperature",
                &self.temperature.to_string(),
                "must be between 0.0 and 2.0",
            ));
        }
        if self.timeout_secs < 1 || self.timeout_secs > 600 {
            return Err(invalid(
                "timeout_secs",
                &self.timeout_secs.to_string(),
                "must be between 1 and 600",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> EditError {
    EditError::Config {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_GREETING: &str = "Assalamu Alaikum! How can I help?";
pub const ENDPOINT_ENV: &str = "ICF_CHAT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub greeting: String,
    pub start_expanded: bool,
    pub start_large: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            start_expanded: false,
            start_large: false,
            request_timeout_secs: None,
        }
    }

    /// Load from the user config dir, falling back to defaults when the file
    /// can't be used. The endpoint override from the environment is applied
    /// either way; the second value carries any problem worth reporting.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        let env_endpoint = std::env::var(ENDPOINT_ENV).ok();

        match Self::get_config_path() {
            Ok(path) => Self::load_or_default_from(&path, env_endpoint),
            Err(err) => {
                let mut config = Self::new();
                config.apply_endpoint_override(env_endpoint);
                (config, Some(err))
            }
        }
    }

    /// Same as [`Config::load_or_default`] for an explicit path. A missing
    /// file is created with the defaults so there is something to edit.
    pub fn load_or_default_from(
        path: &Path,
        env_endpoint: Option<String>,
    ) -> (Self, Option<anyhow::Error>) {
        let (mut config, problem) = if path.exists() {
            match Self::load_from(path) {
                Ok(config) => (config, None),
                Err(err) => {
                    let err = err.context(format!("could not read {}", path.display()));
                    (Self::new(), Some(err))
                }
            }
        } else {
            let config = Self::new();
            let problem = config
                .save_to(path)
                .err()
                .map(|err| err.context(format!("could not write {}", path.display())));
            (config, problem)
        };

        config.apply_endpoint_override(env_endpoint);
        (config, problem)
    }

    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("icf-chat").join("config.json"))
    }
}

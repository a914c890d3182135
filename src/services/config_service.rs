use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use super::history_service::HISTORY_TITLE_MAX_LEN;
use super::search_service::{DEBOUNCE_DELAY, SEARCH_TITLE_MAX_LEN};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const BASE_URL_ENV: &str = "ECHOBOT_BASE_URL";
const SESSION_ENV: &str = "ECHOBOT_SESSION";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEBOUNCE_DELAY.as_millis() as u64
}

fn default_history_title_len() -> usize {
    HISTORY_TITLE_MAX_LEN
}

fn default_search_title_len() -> usize {
    SEARCH_TITLE_MAX_LEN
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_history_title_len")]
    pub history_title_len: usize,
    #[serde(default = "default_search_title_len")]
    pub search_title_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            debounce_ms: default_debounce_ms(),
            history_title_len: default_history_title_len(),
            search_title_len: default_search_title_len(),
        }
    }
}

impl Config {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Apply `ECHOBOT_BASE_URL` / `ECHOBOT_SESSION` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(session) = std::env::var(SESSION_ENV) {
            if !session.trim().is_empty() {
                self.session_cookie = Some(session);
            }
        }
        self
    }
}

pub fn get_app_data_dir() -> ClientResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ClientError::Config("Could not find data directory".to_string()))?
        .join("EchoBot");

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

pub fn get_config_path() -> ClientResult<PathBuf> {
    Ok(get_app_data_dir()?.join("config.json"))
}

pub fn load_config_from(path: &Path) -> ClientResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ClientError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

pub fn save_config_to(path: &Path, config: &Config) -> ClientResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_config() -> ClientResult<Config> {
    load_config_from(&get_config_path()?)
}

pub fn save_config(config: &Config) -> ClientResult<()> {
    save_config_to(&get_config_path()?, config)
}

/// File config with environment overrides applied.
pub fn get_effective_config() -> ClientResult<Config> {
    Ok(load_config()?.with_env_overrides())
}

pub fn set_base_url(url: &str) -> ClientResult<()> {
    url::Url::parse(url)?;
    let mut config = load_config().unwrap_or_default();
    config.base_url = url.to_string();
    save_config(&config)
}

pub fn set_session_cookie(cookie: Option<&str>) -> ClientResult<()> {
    let mut config = load_config().unwrap_or_default();
    config.session_cookie = cookie.map(str::to_string);
    save_config(&config)
}

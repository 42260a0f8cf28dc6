//! ShopDesk configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShopDeskError};

/// Env var pointing at an alternative config file.
pub const CONFIG_ENV: &str = "SHOPDESK_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopDeskConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub faq: FaqConfig,
}

impl ShopDeskConfig {
    /// Load config from `$SHOPDESK_CONFIG` or the default path (~/.shopdesk/config.toml).
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShopDeskError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ShopDeskError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShopDeskError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Config path honoring `$SHOPDESK_CONFIG`.
    pub fn resolve_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the ShopDesk home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shopdesk")
    }

    /// Thresholds live on a 0–100 scale.
    pub fn validate(&self) -> Result<()> {
        for (name, profile) in [("ask", &self.faq.ask), ("chat", &self.faq.chat)] {
            if !(0.0..=100.0).contains(&profile.threshold) {
                return Err(ShopDeskError::Config(format!(
                    "faq.{name}.threshold must be within 0..=100, got {}",
                    profile.threshold
                )));
            }
        }
        Ok(())
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_cors_origins() -> Vec<String> { vec!["http://localhost:5173".into()] }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite` or `memory`.
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String { "sqlite".into() }
fn default_store_path() -> String { "~/.shopdesk/shopdesk.db".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// Store path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

/// FAQ matching profiles, one per endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_ask_profile")]
    pub ask: FaqProfileConfig,
    #[serde(default = "default_chat_profile")]
    pub chat: FaqProfileConfig,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            ask: default_ask_profile(),
            chat: default_chat_profile(),
        }
    }
}

/// Matching policy for one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqProfileConfig {
    /// Minimum accepted similarity score (0–100).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// `token_set`, `token_sort` or `ratio`.
    #[serde(default = "default_scorer")]
    pub scorer: String,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_threshold() -> f64 { 80.0 }
fn default_scorer() -> String { "token_set".into() }
fn default_fallback() -> String { "I'm sorry, I don't have information about that.".into() }

fn default_ask_profile() -> FaqProfileConfig {
    FaqProfileConfig {
        threshold: 80.0,
        scorer: default_scorer(),
        fallback: "I'm sorry, I couldn't find an answer to your question.".into(),
    }
}

fn default_chat_profile() -> FaqProfileConfig {
    FaqProfileConfig {
        threshold: 70.0,
        scorer: default_scorer(),
        fallback: default_fallback(),
    }
}

impl Default for FaqProfileConfig {
    fn default() -> Self {
        default_ask_profile()
    }
}

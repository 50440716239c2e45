//! Service settings structs, defaults, environment overrides and TOML
//! persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppPaths;

/// Environment variable naming an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "POSTCRAFT_CONFIG";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Configuration problems that stop the service from starting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A provider credential is absent or empty.
    #[error("missing API key for {provider} (set {env_var} or [{section}].api_key)")]
    MissingApiKey {
        provider: &'static str,
        section: &'static str,
        env_var: &'static str,
    },
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PrimaryConfig
// ---------------------------------------------------------------------------

/// Primary provider: any OpenAI-compatible chat-completions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Base URL; `/chat/completions` is appended.
    ///
    /// - OpenRouter default: `https://openrouter.ai/api/v1`
    /// - OpenAI: `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer token.  Required at startup.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            model: "deepseek/deepseek-chat".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// FallbackConfig
// ---------------------------------------------------------------------------

/// Fallback provider: Google Gemini `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub base_url: String,
    /// API key passed as the `key` query parameter.  Required at startup.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key: None,
            model: "gemini-pro".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Token budgets and the scoring switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Token budget for generation, refinement and humanize calls.
    pub max_output_tokens: u32,
    /// Token budget for the virality scoring call.
    pub scoring_max_tokens: u32,
    /// Run the virality scoring pass after generation.
    pub scoring_enabled: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            scoring_max_tokens: 1024,
            scoring_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level service configuration, serialised as `settings.toml`.
///
/// # Loading
///
/// ```rust,no_run
/// use postcraft::config::AppConfig;
///
/// // File (or defaults), then environment overrides, then credential check.
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env();
/// config.validate().expect("both provider keys are required");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub primary: PrimaryConfig,
    pub fallback: FallbackConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load from `$POSTCRAFT_CONFIG` when set, otherwise from the
    /// platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The settings file `load` reads.
    pub fn settings_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| AppPaths::new().settings_file)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup.  Empty values are ignored.
    ///
    /// | Variable              | Field                |
    /// |-----------------------|----------------------|
    /// | `OPENROUTER_API_KEY`  | `primary.api_key`    |
    /// | `OPENROUTER_API_BASE` | `primary.base_url`   |
    /// | `GEMINI_API_KEY`      | `fallback.api_key`   |
    /// | `POSTCRAFT_ADDR`      | `server.bind_addr`   |
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.primary.api_key = Some(key);
        }
        if let Some(base) = get("OPENROUTER_API_BASE") {
            self.primary.base_url = base;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.fallback.api_key = Some(key);
        }
        if let Some(addr) = get("POSTCRAFT_ADDR") {
            self.server.bind_addr = addr;
        }
    }

    /// Both provider credentials must be present before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !has_key(&self.primary.api_key) {
            return Err(ConfigError::MissingApiKey {
                provider: "primary",
                section: "primary",
                env_var: "OPENROUTER_API_KEY",
            });
        }
        if !has_key(&self.fallback.api_key) {
            return Err(ConfigError::MissingApiKey {
                provider: "fallback",
                section: "fallback",
                env_var: "GEMINI_API_KEY",
            });
        }
        Ok(())
    }
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

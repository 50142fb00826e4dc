use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::error::ClassifyError;

/// Environment variable holding the Azure OpenAI resource endpoint.
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";

/// Environment variable holding the Azure OpenAI key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Everything the classifier needs to reach the model, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub model: ModelConfig,
}

/// Endpoint and key read from the process environment.
#[derive(Clone)]
pub struct Credentials {
    pub api_base: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read [`API_BASE_VAR`] and [`API_KEY_VAR`]; unset or blank values are
    /// a [`ClassifyError::Configuration`].
    pub fn from_env() -> Result<Self, ClassifyError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClassifyError> {
        let require = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    ClassifyError::Configuration(format!("{} must be set", name))
                })
        };

        Ok(Self {
            api_base: require(API_BASE_VAR)?,
            api_key: require(API_KEY_VAR)?,
        })
    }
}

/// Optional settings file, deserialized from `.ot-classifier/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub model: ModelConfig,
}

/// Which deployment to call and how.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Azure deployment name.
    #[serde(default = "default_deployment")]
    pub deployment: String,
    /// Value of the `api-version` query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Completion length cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request timeout at the HTTP layer.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_deployment() -> String {
    "text-davinci-003".to_string()
}

fn default_api_version() -> String {
    "2022-12-01".to_string()
}

fn default_max_tokens() -> u32 {
    256
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            deployment: default_deployment(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Load the settings file, searching in order:
///
/// 1. `settings_override` — path passed via `--config`
/// 2. `<cwd>/.ot-classifier/config.toml`
/// 3. `~/.config/ot-classifier/config.toml`
/// 4. Built-in [`Settings::default`]
pub fn load_settings(cwd: &Path, settings_override: Option<&Path>) -> Result<Settings> {
    if let Some(path) = settings_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let local = cwd.join(".ot-classifier").join("config.toml");
    if local.exists() {
        let content = std::fs::read_to_string(&local)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("ot-classifier").join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Settings::default())
}

/// Build the startup [`Config`]. Credentials are checked first so a missing
/// key fails before any file is touched.
pub fn load_config(
    cwd: &Path,
    settings_override: Option<&Path>,
    deployment_override: Option<&str>,
) -> Result<Config> {
    let credentials = Credentials::from_env()?;
    let mut model = load_settings(cwd, settings_override)?.model;

    if let Some(deployment) = deployment_override {
        model.deployment = deployment.to_string();
    }

    Ok(Config { credentials, model })
}

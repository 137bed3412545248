//! Application configuration stored in `feedback.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "feedback.toml";

/// Feedback configuration (TOML).
///
/// Meant to be edited by humans. Missing fields fall back to defaults that
/// run locally with a file-backed store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FeedbackConfig {
    pub server: ServerConfig,
    pub form: FormConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web server binds to.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormConfig {
    /// How long the thank-you state is shown before the form returns to idle.
    pub success_display_secs: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_display_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local; records vanish on restart.
    Memory,
    /// JSON document on local disk.
    File,
    /// Hosted PostgREST-compatible table.
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// File backend: path of the JSON document.
    pub path: PathBuf,

    /// Rest backend: base URL of the hosted project (without `/rest/v1`).
    pub url: String,

    /// Rest backend: environment variable holding the API key.
    pub api_key_env: String,

    /// Rest backend: per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: PathBuf::from("feedbacks.json"),
            url: String::new(),
            api_key_env: "FEEDBACK_STORE_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

impl FeedbackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be > 0"));
        }
        if self.server.bind.trim().is_empty() {
            return Err(anyhow!("server.bind must be non-empty"));
        }
        if self.form.success_display_secs == 0 {
            return Err(anyhow!("form.success_display_secs must be > 0"));
        }
        if self.store.timeout_secs == 0 {
            return Err(anyhow!("store.timeout_secs must be > 0"));
        }
        match self.store.backend {
            StoreBackend::Memory => {}
            StoreBackend::File => {
                if self.store.path.as_os_str().is_empty() {
                    return Err(anyhow!("store.path must be set for the file backend"));
                }
            }
            StoreBackend::Rest => {
                if self.store.url.trim().is_empty() {
                    return Err(anyhow!("store.url must be set for the rest backend"));
                }
                if self.store.api_key_env.trim().is_empty() {
                    return Err(anyhow!("store.api_key_env must be set for the rest backend"));
                }
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `FeedbackConfig::default()`.
pub fn load_config(path: &Path) -> Result<FeedbackConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = FeedbackConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FeedbackConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &FeedbackConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

/// Replace `path` with `contents` via a sibling temp file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

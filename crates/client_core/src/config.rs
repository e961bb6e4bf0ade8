use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "assistant.toml";
const SETTINGS_DIR_NAME: &str = "insurance-assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    /// `0` disables the per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 120,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn default_settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    paths
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(&default_settings_paths(), |key| std::env::var(key).ok())
}

/// Defaults, then the first readable settings file, then environment overrides.
pub fn load_settings_from(
    paths: &[PathBuf],
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(file_cfg) = paths.iter().find_map(|path| read_file_settings(path)) {
        if let Some(v) = file_cfg.base_url {
            settings.base_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("ASSISTANT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => tracing::warn!(value = %v, %err, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    settings
}

fn read_file_settings(path: &Path) -> Option<FileSettings> {
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str::<FileSettings>(&raw) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded assistant settings file");
            Some(cfg)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unparsable settings file");
            None
        }
    }
}

/// Parses the service base URL so that endpoint paths join underneath it.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).with_context(|| format!("invalid base url '{raw}'"))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("base url '{raw}' must use http or https");
    }
    if url.cannot_be_a_base() {
        bail!("base url '{raw}' cannot carry endpoint paths");
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

//! Application configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};
use url::Url;

use crate::{
    core::{DashClient, DashError},
    runtime::RuntimeConfig,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct DashConfig {
    /// Site the feeds are served from.
    pub base_url: String,
    pub news_path: String,
    pub zones_path: String,
    pub refresh_secs: u64,
    pub rotate_secs: u64,
    pub clock_millis: u64,
    /// Rendered page destination.
    pub output: PathBuf,
    /// Directory for persisted pins, edits and saved news.
    pub store_dir: PathBuf,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            news_path: "data/news.json".to_string(),
            zones_path: "data/ufm2.json".to_string(),
            refresh_secs: 60,
            rotate_secs: 60,
            clock_millis: 1000,
            output: PathBuf::from("index.html"),
            store_dir: PathBuf::from(".livedash"),
            user_agent: None,
            timeout_secs: Some(20),
        }
    }
}

impl DashConfig {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns a `DashError` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, DashError> {
        let buf = fs::read(path)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns a `DashError` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), DashError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Builds the HTTP client described by this configuration.
    ///
    /// # Errors
    /// Returns a `DashError` if `base_url` is not a valid URL or the client cannot be built.
    pub fn client(&self) -> Result<DashClient, DashError> {
        let mut builder = DashClient::builder()
            .base_url(Url::parse(&self.base_url)?)
            .news_path(self.news_path.clone())
            .zones_path(self.zones_path.clone());
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Timer periods and output path for the runtime.
    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            refresh: Duration::from_secs(self.refresh_secs),
            rotate: Duration::from_secs(self.rotate_secs),
            clock: Duration::from_millis(self.clock_millis),
            output: Some(self.output.clone()),
        }
    }
}

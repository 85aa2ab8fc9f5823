// src/config/mod.rs
//! Configuration module - library location, catalog source, server address
//! and key-step settings, read from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogProvider, LibraryDir, ManifestFile};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ambimix.json";

/// Where the player reads its catalog from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// The pre-generated JSON manifest.
    #[default]
    Manifest,
    /// Scan the library directory at startup.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `audio/music/` and `audio/binaural/`.
    pub library_root: PathBuf,
    /// Manifest location; `<library_root>/audio-list.json` when unset.
    pub manifest_path: Option<PathBuf>,
    pub catalog_source: CatalogSource,
    pub listen_addr: String,
    /// Log destination while the terminal UI owns the screen.
    pub log_file: PathBuf,
    pub tick_ms: u64,
    pub volume_step: u8,
    pub seek_step_secs: f64,
    /// Restart each track at its end; `l` toggles it at runtime.
    pub looping: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("public"),
            manifest_path: None,
            catalog_source: CatalogSource::Manifest,
            listen_addr: "127.0.0.1:3000".to_string(),
            log_file: PathBuf::from("ambimix.log"),
            tick_ms: 100,
            volume_step: 5,
            seek_step_secs: 10.0,
            looping: true,
        }
    }
}

impl Config {
    /// Load `path`, or `ambimix.json` in the working directory.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            if explicit {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.library_root.join("audio-list.json"))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    /// The catalog provider selected by `catalog_source`.
    pub fn catalog_provider(&self) -> Box<dyn CatalogProvider + Send> {
        match self.catalog_source {
            CatalogSource::Manifest => Box::new(ManifestFile::new(self.manifest_path())),
            CatalogSource::Directory => Box::new(LibraryDir::new(self.library_root.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config =
            Config::from_json(r#"{"library_root": "/srv/sounds", "catalog_source": "directory"}"#)
                .unwrap();
        assert_eq!(config.library_root, PathBuf::from("/srv/sounds"));
        assert_eq!(config.catalog_source, CatalogSource::Directory);
        assert_eq!(config.volume_step, 5);
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/srv/sounds/audio-list.json")
        );
    }

    #[test]
    fn looping_defaults_on_and_can_be_disabled() {
        assert!(Config::default().looping);
        let config = Config::from_json(r#"{"looping": false}"#).unwrap();
        assert!(!config.looping);
        assert_eq!(config.tick_ms, 100);
    }

    #[test]
    fn explicit_manifest_path_wins() {
        let config = Config::from_json(r#"{"manifest_path": "list.json"}"#).unwrap();
        assert_eq!(config.manifest_path(), PathBuf::from("list.json"));
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(Config::from_json(r#"{"tick_ms": "fast"}"#).is_err());
        assert!(Config::from_json(r#"{"catalog_source": "database"}"#).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/ambimix.json"))).is_err());
    }

    #[test]
    fn tick_rate_has_a_floor() {
        let config = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_rate(), Duration::from_millis(10));
    }
}

// src/catalog/manifest.rs
//! The static JSON manifest: `{ "music": [...], "binaural": [...] }`.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    error::CatalogError,
    scanner::{scan_kind, MissingDir},
    track::{ChannelKind, Track},
};

/// Both track lists, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub music: Vec<Track>,
    pub binaural: Vec<Track>,
}

impl Catalog {
    pub fn tracks(&self, kind: ChannelKind) -> &[Track] {
        match kind {
            ChannelKind::Music => &self.music,
            ChannelKind::Binaural => &self.binaural,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.music.is_empty() && self.binaural.is_empty()
    }

    /// Parse and validate an untrusted manifest document.
    ///
    /// Both keys must be arrays of `{id, name, url}` records with string
    /// fields; ids must be non-empty and unique within their kind.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in ChannelKind::ALL {
            let mut seen = HashSet::new();
            for track in self.tracks(kind) {
                if track.id.is_empty() {
                    return Err(CatalogError::EmptyId { kind });
                }
                if !seen.insert(track.id.as_str()) {
                    return Err(CatalogError::DuplicateId {
                        kind,
                        id: track.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Scan `<root>/audio/{music,binaural}`; missing directories yield empty lists.
    pub fn scan(root: &Path) -> Result<Self, CatalogError> {
        Ok(Self {
            music: scan_kind(root, ChannelKind::Music, MissingDir::Empty)?,
            binaural: scan_kind(root, ChannelKind::Binaural, MissingDir::Empty)?,
        })
    }

    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Write the catalog as pretty-printed JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| CatalogError::io(path, e))?;
        info!(
            path = %path.display(),
            music = self.music.len(),
            binaural = self.binaural.len(),
            "wrote audio manifest"
        );
        Ok(())
    }
}

// src/catalog/provider.rs
//! Catalog providers: where the player gets its track lists from.

use std::path::PathBuf;

use super::{
    error::CatalogError,
    manifest::Catalog,
    scanner::{scan_kind, MissingDir},
    track::{ChannelKind, Track},
};

/// Read-only source of track lists, one per channel kind.
pub trait CatalogProvider {
    fn list(&self, kind: ChannelKind) -> Result<Vec<Track>, CatalogError>;

    /// Fetch both lists at once.
    fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog = Catalog {
            music: self.list(ChannelKind::Music)?,
            binaural: self.list(ChannelKind::Binaural)?,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

impl CatalogProvider for Catalog {
    fn list(&self, kind: ChannelKind) -> Result<Vec<Track>, CatalogError> {
        Ok(self.tracks(kind).to_vec())
    }
}

/// A precomputed JSON manifest on disk.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for ManifestFile {
    fn list(&self, kind: ChannelKind) -> Result<Vec<Track>, CatalogError> {
        Ok(self.load()?.tracks(kind).to_vec())
    }

    fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::load(&self.path)
    }
}

/// The library directory itself, scanned on every request.
#[derive(Debug, Clone)]
pub struct LibraryDir {
    pub root: PathBuf,
}

impl LibraryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CatalogProvider for LibraryDir {
    fn list(&self, kind: ChannelKind) -> Result<Vec<Track>, CatalogError> {
        scan_kind(&self.root, kind, MissingDir::Create)
    }
}

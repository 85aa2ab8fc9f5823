// src/catalog/mod.rs
//! Catalog module - track records, directory scanning, the JSON manifest and
//! the HTTP listing endpoint.

pub mod error;
pub mod locator;
pub mod manifest;
pub mod provider;
pub mod scanner;
pub mod server;
pub mod track;

// Re-export commonly used types
pub use error::CatalogError;
pub use manifest::Catalog;
pub use provider::{CatalogProvider, LibraryDir, ManifestFile};
pub use track::{ChannelKind, Track};

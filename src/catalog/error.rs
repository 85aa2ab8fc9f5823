// src/catalog/error.rs
//! Failures while building or reading the track catalog.

use std::{io, path::PathBuf};

use thiserror::Error;

use super::track::ChannelKind;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid channel kind `{0}`")]
    InvalidKind(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed catalog: {0}")]
    Malformed(String),

    #[error("{kind} track has an empty id")]
    EmptyId { kind: ChannelKind },

    #[error("duplicate {kind} track id `{id}`")]
    DuplicateId { kind: ChannelKind, id: String },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Malformed(err.to_string())
    }
}

// src/catalog/track.rs
//! Track records and the two channel kinds they belong to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// The two independent audio slots of the mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Music,
    Binaural,
}

impl ChannelKind {
    /// Both kinds, in display order.
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Music, ChannelKind::Binaural];

    /// Lowercase name used in URLs, directory names and the manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Music => "music",
            ChannelKind::Binaural => "binaural",
        }
    }

    /// Human label for the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Music => "Music Track",
            ChannelKind::Binaural => "Binaural Beat",
        }
    }

    /// The other channel.
    pub fn other(&self) -> ChannelKind {
        match self {
            ChannelKind::Music => ChannelKind::Binaural,
            ChannelKind::Binaural => ChannelKind::Music,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "music" => Ok(ChannelKind::Music),
            "binaural" => Ok(ChannelKind::Binaural),
            other => Err(CatalogError::InvalidKind(other.to_string())),
        }
    }
}

/// One playable item of the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique within its kind; the source filename.
    pub id: String,
    /// Display label: the filename without its extension.
    pub name: String,
    /// Locator the playback backend resolves, e.g. `/audio/music/rain.mp3`.
    #[serde(alias = "file_url")]
    pub url: String,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Strip the trailing `.ext` from a filename. Only the last extension goes;
/// a dot-free name is returned unchanged.
pub fn display_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[..dot],
        _ => file_name,
    }
}

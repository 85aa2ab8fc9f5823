// src/catalog/scanner.rs
//! Directory scanning: turn `<root>/audio/<kind>/` into an ordered list of tracks.

use std::{fs, io, path::Path};

use tracing::debug;

use super::{
    error::CatalogError,
    locator::{kind_dir, track_url},
    track::{display_name, ChannelKind, Track},
};

/// Extensions accepted as audio, compared case-insensitively.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// What to do when the kind directory does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDir {
    /// Report an empty list.
    Empty,
    /// Create the directory, then report an empty list.
    Create,
}

/// True for visible files whose extension is one of [`AUDIO_EXTENSIONS`].
pub fn is_audio_file(file_name: &str) -> bool {
    if file_name.starts_with('.') {
        return false;
    }
    let lower = file_name.to_lowercase();
    AUDIO_EXTENSIONS
        .iter()
        .any(|ext| lower.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
}

/// Build the track record for a file of `kind`.
pub fn track_for_file(kind: ChannelKind, file_name: &str) -> Track {
    Track::new(
        file_name,
        display_name(file_name),
        track_url(kind, file_name),
    )
}

/// List the tracks of `kind` below `root`, sorted by filename (case-insensitive).
pub fn scan_kind(root: &Path, kind: ChannelKind, missing: MissingDir) -> Result<Vec<Track>, CatalogError> {
    let dir = kind_dir(root, kind);

    if !dir.exists() {
        if missing == MissingDir::Create {
            fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;
            debug!(dir = %dir.display(), "created missing audio directory");
        }
        return Ok(Vec::new());
    }

    let mut names = fs::read_dir(&dir)
        .and_then(|entries| {
            entries
                .map(|entry| {
                    let entry = entry?;
                    let is_file = entry.file_type()?.is_file() || entry.path().is_file();
                    Ok((entry.file_name().to_string_lossy().into_owned(), is_file))
                })
                .collect::<io::Result<Vec<_>>>()
        })
        .map_err(|e| CatalogError::io(&dir, e))?
        .into_iter()
        .filter(|(name, is_file)| *is_file && is_audio_file(name))
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

    names.sort_by_key(|n| n.to_lowercase());
    debug!(kind = %kind, count = names.len(), "scanned audio directory");

    Ok(names.iter().map(|n| track_for_file(kind, n)).collect())
}

// src/catalog/locator.rs
//! Track locators: building `/audio/<kind>/<file>` URLs and mapping them back
//! onto files inside the library root.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use super::track::ChannelKind;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape a single path segment.
pub fn encode_component(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Locator for `file_name` under the kind's namespace.
pub fn track_url(kind: ChannelKind, file_name: &str) -> String {
    format!("/audio/{}/{}", kind.as_str(), encode_component(file_name))
}

/// Directory holding the audio files of `kind` below `root`.
pub fn kind_dir(root: &Path, kind: ChannelKind) -> PathBuf {
    root.join("audio").join(kind.as_str())
}

/// Map a locator back to a file below `root`.
///
/// Returns `None` when the locator is not valid UTF-8 after decoding or would
/// escape the root (`..`, absolute or prefixed components).
pub fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url.trim_start_matches('/'))
        .decode_utf8()
        .ok()?;
    let relative = Path::new(decoded.as_ref());
    let mut path = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (path != root).then_some(path)
}

// src/audio/metadata.rs
//! Track length lookup using Lofty, for streams whose decoder cannot tell.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use lofty::file::AudioFile;
use lofty::probe::Probe;

/// Read the total length from the file's audio properties.
/// Safe to call from any thread; does not touch playback state.
pub fn probe_duration(path: &Path) -> Result<Option<Duration>> {
    let tagged_file = Probe::open(path)?.read()?;
    let duration = tagged_file.properties().duration();
    Ok((!duration.is_zero()).then_some(duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::scanner::tests::scratch_dir;

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = scratch_dir("probe");
        let path = dir.join("empty.mp3");
        std::fs::write(&path, b"").unwrap();
        assert!(probe_duration(&path).is_err());
    }
}

// src/audio/mod.rs
//! Audio module - the media-resource seam, the rodio engine behind it, and
//! progress reporting.

pub mod engine;
pub mod media;
pub mod metadata;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use engine::RodioBackend;
pub use media::{MediaBackend, MediaError, MediaEvent, MediaResource, PendingPlay};
pub use progress::ProgressTap;

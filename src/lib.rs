// src/lib.rs
//! ambimix - a two-channel ambient player mixing a music track with a binaural beat.
//!
//! The library holds the catalog, the audio engine and the player core; the binary adds the
//! terminal UI, the manifest generator and the HTTP catalog endpoint.

pub mod app;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod player;
pub mod ui;

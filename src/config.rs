//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives scanning, playback
//! timing and logging, plus helpers to load it from disk and environment.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;

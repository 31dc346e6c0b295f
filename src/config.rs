//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a jdex.toml, and if present we load settings from there.
//! This provides the local store location, editor wrapping width and heading import depth.

use facet::Facet;
use std::fs;

#[derive(Facet, Clone)]
/// User preferences loaded from jdex.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "jdex-store.json".to_string())]
    /// Key/value file the hierarchy and section list are checkpointed to.
    pub storage_path: String,
    #[facet(default = 100)]
    /// Maximum line width for notes editor text wrapping.
    pub wrap_width: usize,
    #[facet(default = 2)]
    /// Deepest heading level imported as a document section.
    pub max_heading_level: usize,
    #[facet(default = false)]
    /// Checkpoint to the local store when the editor quits.
    pub save_on_exit: bool,
}

impl Config {
    #[must_use]
    /// Load configuration from jdex.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string("jdex.toml") {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
            tracing::warn!("ignoring unreadable jdex.toml");
        }
        facet_toml::from_str::<Self>("").unwrap()
    }
}

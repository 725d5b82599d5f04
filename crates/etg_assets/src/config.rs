//! Overlay configuration.
//!
//! The defaults match the conventions mods are packaged with, so most hosts never
//! load a file. When one is used it is plain TOML:
//!
//! ```toml
//! dump_prefix = "DUMP"
//! content_marker = "Content"
//! sprite_prefix = "sprites/"
//! legacy_texture_mapping = false
//! preload_sprite_archive_entries = true
//! ```

use crate::error::Result;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Settings that control how assets are crawled and mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directories whose name starts with this prefix are skipped while crawling.
    pub dump_prefix: String,

    /// Embedded resources are only mapped if their name contains this segment.
    /// Everything up to and including the segment (and its trailing separator) is
    /// stripped to form the overlay path.
    pub content_marker: String,

    /// Textures mapped below `<sprite_prefix><group>/` are tracked per sprite group.
    pub sprite_prefix: String,

    /// Allow `sprites/@<fragment>` textures to replace the atlas of every collection
    /// whose name contains `<fragment>`.
    pub legacy_texture_mapping: bool,

    /// Extract archive entries under the sprite prefix into memory while crawling,
    /// instead of reopening the archive for every read.
    pub preload_sprite_archive_entries: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dump_prefix: "DUMP".to_string(),
            content_marker: "Content".to_string(),
            sprite_prefix: "sprites/".to_string(),
            legacy_texture_mapping: false,
            preload_sprite_archive_entries: true,
        }
    }
}

impl AssetsConfig {
    /// Load a configuration file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist and `Err` if it can't be parsed.
    /// Missing keys keep their default values.
    pub fn load(path: &Utf8Path) -> Result<Option<Self>> {
        if !path.as_std_path().exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path.as_std_path())?;
        Ok(Some(toml::from_str(&contents)?))
    }

    /// Load a configuration file, or fall back to the defaults if it doesn't exist.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }
}

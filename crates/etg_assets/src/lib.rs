//! Runtime asset overlay for game mods.
//!
//! This crate lets mods replace or extend a game's resources without the game's own
//! loader knowing about it. It provides:
//!
//! - **Byte-source descriptors**: [`AssetMetadata`] describes where an asset's bytes
//!   live (a file, a zip entry or an embedded resource), optionally clipped to a range
//! - **Overlay map**: [`AssetMap`] maps case-insensitive logical paths to
//!   descriptors, with directory markers kept apart from leaf assets
//! - **Crawling**: directories, zip archives and embedded resource sets are mapped
//!   in one go, and a failing source leaves the overlay untouched
//! - **Incremental sprite patching**: textures mapped below `sprites/<group>/` are
//!   tracked per group so [`handle_sprites`] only touches what changed
//! - **Animation grouping**: [`AnimationSpriteCache`] turns flat frame names into
//!   ordered animation sequences and only rescans collections that changed
//! - **Load resolution**: [`load`] resolves a host load request against the overlay
//!   and falls back to the host's own loader
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use etg_assets::{AnimationSpriteCache, AssetMap, AssetsConfig, SpriteCollection};
//!
//! # fn main() -> etg_assets::Result<()> {
//! let mut map = AssetMap::new(AssetsConfig::default());
//! map.crawl_dir(Utf8Path::new("mods/HeroMod/resources"))?;
//!
//! let mut hero = SpriteCollection::new("hero", Vec::new());
//! let report = etg_assets::handle_sprites(&mut map, &mut hero);
//! println!("{} frames added", report.frames_added);
//!
//! let mut cache = AnimationSpriteCache::new();
//! if let Some(frames) = cache.rescan_and_get_frames(&hero, "hero", "idle") {
//!     println!("idle has {} frames", frames.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod config;
pub mod crawl;
pub mod error;
pub mod limited;
pub mod load;
pub mod map;
pub mod metadata;
pub mod sprite_lookup;
pub mod sprites;
pub mod utils;

// Re-export main types
pub use animation::{parse_frame_name, AnimationSpriteCache, FrameRef, WELL_KNOWN_ANIMATIONS};
pub use config::AssetsConfig;
pub use error::{Error, Result};
pub use limited::LimitedStream;
pub use load::{decode_png, load, AssetHost, RequestKind};
pub use map::{AssetMap, MappedAsset};
pub use metadata::{
    AssetKind, AssetMetadata, AssetStream, Container, EmbeddedResources, ReadSeek, ResourceSet,
};
pub use sprite_lookup::SpriteCollectionLookup;
pub use sprites::{handle_sprites, SpriteCollection, SpriteFrame, SpritePatchReport};

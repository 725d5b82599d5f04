//! Applying sprite overrides to sprite collections.
//!
//! A [`SpriteCollection`] is the overlay's view of one of the host's sprite
//! collections: a name, an optional atlas override and an immutable frame array.
//! [`handle_sprites`] consolidates the collection against the overlay: it picks up
//! an atlas replacement and applies the sprite overrides mapped since the last call,
//! replacing existing frames or appending new ones.
//!
//! The frame array is shared behind an [`Arc`] and doubles as the collection's
//! identity token. Applying changes publishes a new array, which is what tells the
//! [`AnimationSpriteCache`](crate::animation::AnimationSpriteCache) to rescan.

use crate::map::AssetMap;
use crate::metadata::AssetMetadata;
use std::sync::Arc;

/// A single frame of a sprite collection.
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    pub name: String,
    /// Invalid frames are placeholders and are never matched by name.
    pub valid: bool,
    /// Overlay asset whose texture replaces the frame's original texture.
    pub source: Option<AssetMetadata>,
}

impl SpriteFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid: true,
            source: None,
        }
    }

    /// A placeholder slot.
    pub fn invalid() -> Self {
        Self {
            name: String::new(),
            valid: false,
            source: None,
        }
    }
}

/// A named, ordered set of sprite frames.
#[derive(Debug, Clone)]
pub struct SpriteCollection {
    name: String,
    frames: Arc<[SpriteFrame]>,
    atlas: Option<AssetMetadata>,
}

impl SpriteCollection {
    pub fn new(name: impl Into<String>, frames: Vec<SpriteFrame>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into(),
            atlas: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &Arc<[SpriteFrame]> {
        &self.frames
    }

    /// Overlay asset that replaces the whole atlas texture, if any.
    pub fn atlas(&self) -> Option<&AssetMetadata> {
        self.atlas.as_ref()
    }

    /// Index of the valid frame called `name`.
    pub fn frame_index(&self, name: &str) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| frame.valid && frame.name == name)
    }

    /// Replace the frame array, giving the collection a new identity.
    pub fn set_frames(&mut self, frames: Vec<SpriteFrame>) {
        self.frames = frames.into();
    }
}

/// What [`handle_sprites`] did to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpritePatchReport {
    /// The atlas replacement was set or changed.
    pub atlas_replaced: bool,
    /// Existing frames whose texture source was replaced.
    pub frames_replaced: usize,
    /// Frames appended to the collection.
    pub frames_added: usize,
    /// Overrides that matched no frame and could not be added.
    pub skipped: usize,
}

impl SpritePatchReport {
    /// Whether the frame array was rebuilt.
    pub fn frames_changed(&self) -> bool {
        self.frames_replaced > 0 || self.frames_added > 0
    }
}

/// Consolidate `collection` against the overlay.
///
/// 1. If `sprites/<collection>` is mapped, it becomes the atlas replacement;
///    otherwise a legacy `sprites/@<fragment>` match is used when enabled.
/// 2. The overrides recorded for the collection's sprite group since the last call
///    are drained. If there are none, the frame array is left untouched.
/// 3. Each override's frame name is its path below `sprites/<collection>/`. An
///    exact match replaces that frame's source; a name starting with `@` falls back
///    to the first valid frame whose name contains the rest; anything else is
///    appended as a new frame.
pub fn handle_sprites(map: &mut AssetMap, collection: &mut SpriteCollection) -> SpritePatchReport {
    let mut report = SpritePatchReport::default();
    let path = format!("{}{}", map.config().sprite_prefix, collection.name);

    let atlas = map
        .resolve(&path, false)
        .or_else(|| map.find_legacy_atlas(&collection.name).map(|m| &m.metadata))
        .cloned();
    if let Some(atlas) = atlas {
        let unchanged = collection
            .atlas
            .as_ref()
            .is_some_and(|current| current.same_source(&atlas));
        if !unchanged {
            tracing::debug!("Replacing atlas of {} with {}", collection.name, atlas.container());
            collection.atlas = Some(atlas);
            report.atlas_replaced = true;
        }
    }

    let Some(changes) = map
        .sprite_collection_mut(&collection.name)
        .and_then(|lookup| lookup.take_unprocessed_changes())
    else {
        return report;
    };

    let mut frames = collection.frames.to_vec();
    let frame_prefix = format!("{}/", path);

    let mut changes: Vec<_> = changes.into_iter().collect();
    changes.sort_by(|a, b| a.0.cmp(&b.0));

    for (asset_path, metadata) in changes {
        let Some(name) = asset_path.strip_prefix(&frame_prefix) else {
            tracing::warn!(
                "Sprite override {} is not below {}, skipping",
                asset_path,
                frame_prefix
            );
            report.skipped += 1;
            continue;
        };

        match find_frame(&frames, name) {
            FrameMatch::Existing(index) => {
                frames[index].source = Some(metadata);
                report.frames_replaced += 1;
            }
            FrameMatch::New => {
                frames.push(SpriteFrame {
                    name: name.to_string(),
                    valid: true,
                    source: Some(metadata),
                });
                report.frames_added += 1;
            }
            FrameMatch::None => {
                tracing::debug!("No frame in {} matches {}", collection.name, name);
                report.skipped += 1;
            }
        }
    }

    if report.frames_changed() {
        collection.set_frames(frames);
    }

    tracing::debug!(
        "Handled sprites of {}: {} replaced, {} added, {} skipped",
        collection.name,
        report.frames_replaced,
        report.frames_added,
        report.skipped
    );

    report
}

enum FrameMatch {
    Existing(usize),
    New,
    None,
}

fn find_frame(frames: &[SpriteFrame], name: &str) -> FrameMatch {
    if let Some(index) = frames.iter().position(|f| f.valid && f.name == name) {
        return FrameMatch::Existing(index);
    }

    match name.strip_prefix('@') {
        Some(fragment) => frames
            .iter()
            .position(|f| f.valid && f.name.contains(fragment))
            .map_or(FrameMatch::None, FrameMatch::Existing),
        None => FrameMatch::New,
    }
}

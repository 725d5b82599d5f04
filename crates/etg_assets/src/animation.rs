//! Grouping flat sprite frames into animation sequences.
//!
//! Weapon sprites follow the naming scheme `<base>_<animation>_<order>`, e.g.
//! `pistol_fire_002`. [`AnimationSpriteCache`] scans a [`SpriteCollection`], buckets
//! its frames by `(base, animation)` and serves each bucket as an order-sorted
//! frame list.
//!
//! Scanning means running a regex over every frame name, so the cache remembers the
//! frame array it last scanned for each collection and skips the scan as long as the
//! collection still holds the very same array.

use crate::sprites::{SpriteCollection, SpriteFrame};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

/// Animation names recognized in frame names.
pub const WELL_KNOWN_ANIMATIONS: &[&str] = &[
    "idle",
    "intro",
    "empty",
    "fire",
    "reload",
    "charge",
    "out_of_ammo",
    "discharge",
    "final_fire",
    "empty_reload",
    "critical_fire",
    "enemy_pre_fire",
    "alternate_shoot",
    "alternate_reload",
];

static FRAME_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let animations = WELL_KNOWN_ANIMATIONS.join("|");
    Regex::new(&format!(
        r"^(?P<base>.*?)_(?P<anim>{})_(?P<order>\d+)$",
        animations
    ))
    .expect("frame name pattern is valid")
});

/// Reference to a frame of a sprite collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameRef {
    /// Name of the sprite collection that owns the frame.
    pub collection: Arc<str>,
    /// Index of the frame in the collection's frame array.
    pub index: usize,
}

/// Split a frame name into `(base, animation, order)`.
///
/// Returns `None` for names that don't follow `<base>_<animation>_<order>` with one
/// of the [`WELL_KNOWN_ANIMATIONS`], or whose order doesn't fit in a `u32`.
pub fn parse_frame_name(name: &str) -> Option<(&str, &str, u32)> {
    let captures = FRAME_NAME_REGEX.captures(name)?;
    let base = captures.name("base")?.as_str();
    let animation = captures.name("anim")?.as_str();
    let order = captures.name("order")?.as_str().parse().ok()?;
    Some((base, animation, order))
}

/// Frames of one `(base, animation)` pair, keyed by order.
#[derive(Debug, Default)]
struct FrameSequence {
    ordered: BTreeMap<u32, FrameRef>,
    frames: Vec<FrameRef>,
    dirty: bool,
}

impl FrameSequence {
    fn set_frame(&mut self, order: u32, frame: FrameRef) {
        self.ordered.insert(order, frame);
        self.dirty = true;
    }

    /// The frames sorted by order. Only re-collected after a write.
    fn frames(&mut self) -> &[FrameRef] {
        if self.dirty {
            self.frames = self.ordered.values().cloned().collect();
            self.dirty = false;
        }
        &self.frames
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AnimationKey {
    base: String,
    animation: String,
}

/// Animation sequences found in one sprite collection.
#[derive(Debug)]
struct AnimationSpriteGroup {
    /// The frame array the sequences were built from.
    identity: Arc<[SpriteFrame]>,
    sequences: HashMap<AnimationKey, FrameSequence>,
}

impl AnimationSpriteGroup {
    fn scan(&mut self, collection: &SpriteCollection) -> usize {
        let name: Arc<str> = Arc::from(collection.name());
        let mut matched = 0;

        for (index, frame) in collection.frames().iter().enumerate() {
            if !frame.valid {
                continue;
            }
            let Some((base, animation, order)) = parse_frame_name(&frame.name) else {
                continue;
            };

            let key = AnimationKey {
                base: base.to_string(),
                animation: animation.to_string(),
            };
            self.sequences.entry(key).or_default().set_frame(
                order,
                FrameRef {
                    collection: name.clone(),
                    index,
                },
            );
            matched += 1;
        }

        matched
    }
}

/// Cache of animation sequences, organized by sprite collection name.
#[derive(Debug, Default)]
pub struct AnimationSpriteCache {
    collections: HashMap<String, AnimationSpriteGroup>,
}

impl AnimationSpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan `collection` if its frame array changed since the last scan.
    ///
    /// Returns `false` without doing any work if the collection still holds the
    /// frame array that was scanned last time. Otherwise every frame is matched
    /// against the naming scheme and written into its sequence, replacing any frame
    /// previously stored at the same order.
    pub fn update_collection(&mut self, collection: &SpriteCollection) -> bool {
        let frames = collection.frames();
        if let Some(group) = self.collections.get(collection.name()) {
            if Arc::ptr_eq(&group.identity, frames) {
                return false;
            }
        }

        let group = self
            .collections
            .entry(collection.name().to_string())
            .or_insert_with(|| AnimationSpriteGroup {
                identity: frames.clone(),
                sequences: HashMap::new(),
            });
        group.identity = frames.clone();

        let matched = group.scan(collection);
        tracing::debug!(
            "Rescanned {} ({} frames, {} animation frames)",
            collection.name(),
            collection.frames().len(),
            matched
        );
        true
    }

    /// Frames of `animation` for `base` in the named collection, sorted by order.
    pub fn animation_frames(
        &mut self,
        collection: &str,
        base: &str,
        animation: &str,
    ) -> Option<&[FrameRef]> {
        let group = self.collections.get_mut(collection)?;
        let key = AnimationKey {
            base: base.to_string(),
            animation: animation.to_string(),
        };
        group.sequences.get_mut(&key).map(FrameSequence::frames)
    }

    /// Rescan `collection` if needed, then look up a sequence.
    pub fn rescan_and_get_frames(
        &mut self,
        collection: &SpriteCollection,
        base: &str,
        animation: &str,
    ) -> Option<&[FrameRef]> {
        self.update_collection(collection);
        self.animation_frames(collection.name(), base, animation)
    }

    /// All `(base, animation)` pairs known for a collection, sorted.
    pub fn animations(&self, collection: &str) -> Vec<(&str, &str)> {
        let Some(group) = self.collections.get(collection) else {
            return Vec::new();
        };
        let mut keys: Vec<(&str, &str)> = group
            .sequences
            .keys()
            .map(|key| (key.base.as_str(), key.animation.as_str()))
            .collect();
        keys.sort_unstable();
        keys
    }
}

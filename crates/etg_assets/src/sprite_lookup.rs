//! Per-group change tracking for sprite overrides.
//!
//! Every texture mapped under `sprites/<group>/` is recorded in that group's
//! [`SpriteCollectionLookup`]. Besides the live set of overrides, the lookup keeps
//! the overrides added since the group was last consolidated, so rebuilding a
//! sprite collection only has to look at what changed.

use crate::metadata::AssetMetadata;
use std::collections::HashMap;

/// Live and pending sprite overrides of one sprite group.
#[derive(Debug, Clone, Default)]
pub struct SpriteCollectionLookup {
    name: String,
    sprites: HashMap<String, AssetMetadata>,
    unprocessed: HashMap<String, AssetMetadata>,
}

impl SpriteCollectionLookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprites: HashMap::new(),
            unprocessed: HashMap::new(),
        }
    }

    /// Name of the sprite group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or update an override. The change is recorded as unprocessed.
    pub fn set(&mut self, key: impl Into<String>, value: AssetMetadata) {
        let key = key.into();
        self.unprocessed.insert(key.clone(), value.clone());
        self.sprites.insert(key, value);
    }

    /// Remove an override from both the live and the unprocessed set.
    ///
    /// Returns `false` if the key wasn't present.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.sprites.remove(key).is_some() {
            self.unprocessed.remove(key);
            return true;
        }
        false
    }

    /// Drop every override, processed or not.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.unprocessed.clear();
    }

    /// Take the overrides changed since the last call.
    ///
    /// Returns `None` if nothing changed. Otherwise the pending set is handed over and
    /// replaced with an empty one, so each change is reported exactly once.
    pub fn take_unprocessed_changes(&mut self) -> Option<HashMap<String, AssetMetadata>> {
        if self.unprocessed.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.unprocessed))
    }

    pub fn unprocessed_count(&self) -> usize {
        self.unprocessed.len()
    }

    pub fn get(&self, key: &str) -> Option<&AssetMetadata> {
        self.sprites.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sprites.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetMetadata)> {
        self.sprites.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(path: &str) -> AssetMetadata {
        AssetMetadata::file(path)
    }

    fn file_path(metadata: &AssetMetadata) -> String {
        metadata.container().to_string()
    }

    #[test]
    fn test_take_changes_twice() {
        let mut lookup = SpriteCollectionLookup::new("hero");
        lookup.set("sprites/hero/a", meta("a.png"));
        lookup.set("sprites/hero/b", meta("b.png"));

        let changes = lookup.take_unprocessed_changes().unwrap();
        assert_eq!(changes.len(), 2);
        assert!(lookup.take_unprocessed_changes().is_none());

        // Drained changes stay in the live set.
        assert_eq!(lookup.len(), 2);
        assert!(lookup.contains_key("sprites/hero/a"));
    }

    #[test]
    fn test_repeated_set_overwrites() {
        let mut lookup = SpriteCollectionLookup::new("hero");
        lookup.set("sprites/hero/a", meta("old.png"));
        lookup.set("sprites/hero/a", meta("new.png"));

        let changes = lookup.take_unprocessed_changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(file_path(&changes["sprites/hero/a"]), "file new.png");
    }

    #[test]
    fn test_changes_after_drain_are_reported() {
        let mut lookup = SpriteCollectionLookup::new("hero");
        lookup.set("sprites/hero/a", meta("a.png"));
        lookup.take_unprocessed_changes().unwrap();

        lookup.set("sprites/hero/b", meta("b.png"));
        let changes = lookup.take_unprocessed_changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("sprites/hero/b"));
    }

    #[test]
    fn test_remove_clears_pending() {
        let mut lookup = SpriteCollectionLookup::new("hero");
        lookup.set("sprites/hero/a", meta("a.png"));
        assert!(lookup.remove("sprites/hero/a"));
        assert!(!lookup.remove("sprites/hero/a"));

        assert_eq!(lookup.unprocessed_count(), 0);
        assert!(lookup.take_unprocessed_changes().is_none());
        assert!(lookup.is_empty());
    }
}

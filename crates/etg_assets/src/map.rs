//! The asset overlay map.
//!
//! [`AssetMap`] maps logical asset paths to [`AssetMetadata`] descriptors. Lookups are
//! case-insensitive and separator-agnostic. Directory markers live in their own
//! table so that a directory and a leaf asset with the same path (e.g. a `hero`
//! folder next to `hero.png`, which maps to `hero`) don't overwrite each other.
//!
//! Later mappings replace earlier ones for the same path, which is how mods loaded
//! later override mods loaded earlier.

use crate::config::AssetsConfig;
use crate::metadata::{AssetKind, AssetMetadata};
use crate::sprite_lookup::SpriteCollectionLookup;
use crate::utils::{normalize_separators, overlay_key, sprite_group};
use std::collections::HashMap;

/// A mapped asset together with the path it was registered under.
#[derive(Debug, Clone)]
pub struct MappedAsset {
    pub path: String,
    pub metadata: AssetMetadata,
}

/// Overlay of mod assets over the host's own resources.
#[derive(Debug, Default)]
pub struct AssetMap {
    config: AssetsConfig,
    /// Lowercased path -> leaf asset.
    entries: HashMap<String, MappedAsset>,
    /// Lowercased path -> directory marker.
    dirs: HashMap<String, MappedAsset>,
    /// Sprite group name -> textures mapped below `sprites/<group>/`.
    sprite_collections: HashMap<String, SpriteCollectionLookup>,
}

impl AssetMap {
    pub fn new(config: AssetsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AssetsConfig {
        &self.config
    }

    /// Register `metadata` under `path`, replacing any previous mapping.
    ///
    /// Backslashes are normalized to forward slashes. If the descriptor's kind is not
    /// set yet, it is inferred from the path's extension and the extension is
    /// removed from the key (`sprites/hero/idle_0.png` maps to `sprites/hero/idle_0`).
    ///
    /// Textures below `sprites/<group>/` are also recorded in that group's
    /// [`SpriteCollectionLookup`].
    pub fn add_mapping(&mut self, path: &str, mut metadata: AssetMetadata) -> &AssetMetadata {
        let mut path = normalize_separators(path);
        let kind = match metadata.kind() {
            Some(kind) => kind,
            None => {
                let (stem, kind) = AssetKind::from_path(&path);
                path.truncate(stem.len());
                metadata.set_kind(kind);
                kind
            }
        };

        tracing::debug!("Mapping {:?} '{}' -> {}", kind, path, metadata.container());

        let key = overlay_key(&path);
        let table = match kind {
            AssetKind::Directory => &mut self.dirs,
            AssetKind::Texture => {
                if let Some(group) = sprite_group(&path, &self.config.sprite_prefix) {
                    self.sprite_collections
                        .entry(group.to_string())
                        .or_insert_with(|| SpriteCollectionLookup::new(group))
                        .set(path.clone(), metadata.clone());
                }
                &mut self.entries
            }
            AssetKind::Generic => &mut self.entries,
        };

        table.insert(key.clone(), MappedAsset { path, metadata });
        &table[&key].metadata
    }

    /// Look up the asset mapped under `path`.
    ///
    /// With `include_dirs`, directory markers are checked first; leaf assets are
    /// checked otherwise or if no marker matches. A miss is `None`.
    pub fn resolve(&self, path: &str, include_dirs: bool) -> Option<&AssetMetadata> {
        self.resolve_entry(path, include_dirs).map(|mapped| &mapped.metadata)
    }

    /// Like [`resolve`](Self::resolve), but also returns the path the asset was mapped under.
    ///
    /// A path that still carries a recognized extension (`hero.png`) also finds the
    /// asset mapped under its stem, since inferred extensions are removed on insert.
    pub fn resolve_entry(&self, path: &str, include_dirs: bool) -> Option<&MappedAsset> {
        let key = overlay_key(path);
        if include_dirs {
            if let Some(mapped) = self.dirs.get(&key) {
                return Some(mapped);
            }
        }
        if let Some(mapped) = self.entries.get(&key) {
            return Some(mapped);
        }

        match AssetKind::from_path(&key) {
            (stem, AssetKind::Texture) => self.entries.get(stem),
            _ => None,
        }
    }

    /// Whether a leaf asset (not a directory marker) is mapped under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&overlay_key(path))
    }

    /// Remove a leaf asset, including its sprite-group record.
    pub fn remove_mapping(&mut self, path: &str) -> Option<AssetMetadata> {
        let mapped = self.entries.remove(&overlay_key(path))?;
        if let Some(group) = sprite_group(&mapped.path, &self.config.sprite_prefix) {
            if let Some(lookup) = self.sprite_collections.get_mut(group) {
                lookup.remove(&mapped.path);
            }
        }
        Some(mapped.metadata)
    }

    /// All leaf assets, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &MappedAsset> {
        self.entries.values()
    }

    /// All directory markers, in no particular order.
    pub fn dirs(&self) -> impl Iterator<Item = &MappedAsset> {
        self.dirs.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn sprite_collection(&self, name: &str) -> Option<&SpriteCollectionLookup> {
        self.sprite_collections.get(name)
    }

    pub fn sprite_collection_mut(&mut self, name: &str) -> Option<&mut SpriteCollectionLookup> {
        self.sprite_collections.get_mut(name)
    }

    pub fn sprite_collections(&self) -> impl Iterator<Item = &SpriteCollectionLookup> {
        self.sprite_collections.values()
    }

    /// Find a legacy whole-atlas replacement for `collection_name`.
    ///
    /// Looks for a data-bearing leaf named `sprites/@<fragment>` whose fragment is
    /// contained in the collection name. Only consulted when
    /// [`AssetsConfig::legacy_texture_mapping`] is enabled.
    pub fn find_legacy_atlas(&self, collection_name: &str) -> Option<&MappedAsset> {
        if !self.config.legacy_texture_mapping {
            return None;
        }

        let marker = format!("{}@", self.config.sprite_prefix);
        self.entries.values().find(|mapped| {
            if !mapped.metadata.has_data() {
                return false;
            }
            match mapped.path.strip_prefix(&marker) {
                Some(fragment) => collection_name.contains(fragment),
                None => false,
            }
        })
    }
}

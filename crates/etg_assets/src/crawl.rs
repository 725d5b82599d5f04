//! Populating the overlay from mod sources.
//!
//! Three kinds of sources are supported:
//!
//! - **Directories** ([`AssetMap::crawl_dir`]): every file becomes a leaf asset and
//!   every subdirectory a directory marker, keyed by the path relative to the root.
//!   Subtrees whose name starts with [`AssetsConfig::dump_prefix`] are skipped.
//! - **Zip archives** ([`AssetMap::crawl_archive`]): every entry is mapped under its
//!   entry name.
//! - **Embedded resources** ([`AssetMap::crawl_resources`]): resources whose name
//!   contains [`AssetsConfig::content_marker`] are mapped under the remainder of the
//!   name.
//!
//! Each crawl collects all of its mappings before registering any of them, so a
//! source that fails halfway (unreadable archive, I/O error during the walk) leaves
//! the overlay exactly as it was.
//!
//! [`AssetsConfig::dump_prefix`]: crate::config::AssetsConfig::dump_prefix
//! [`AssetsConfig::content_marker`]: crate::config::AssetsConfig::content_marker

use crate::error::{Error, Result};
use crate::map::AssetMap;
use crate::metadata::{AssetKind, AssetMetadata, ResourceSet};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::Arc;
use walkdir::WalkDir;
use zip::ZipArchive;

impl AssetMap {
    /// Map every file and directory below `root`.
    ///
    /// Returns the number of mappings added.
    pub fn crawl_dir(&mut self, root: &Utf8Path) -> Result<usize> {
        if !root.as_std_path().is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        let dump_prefix = self.config().dump_prefix.clone();
        let walker = WalkDir::new(root.as_std_path())
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && entry.file_name().to_string_lossy().starts_with(&dump_prefix))
            });

        let mut staged = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = match Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) {
                Ok(p) => p,
                Err(p) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                    continue;
                }
            };

            let rel = path
                .strip_prefix(root)
                .map_err(|_| Error::Other(format!("Crawled path is not under root: {}", path)))?
                .as_str()
                .replace('\\', "/");

            let metadata = if entry.file_type().is_dir() {
                AssetMetadata::directory(path)
            } else {
                AssetMetadata::file(path)
            };
            staged.push((rel, metadata));
        }

        tracing::info!("Crawled {} entries from {}", staged.len(), root);
        Ok(self.commit(staged))
    }

    /// Map every entry of the zip archive at `archive`.
    ///
    /// Directory entries become directory markers. File entries below the sprite
    /// prefix are extracted into memory right away if
    /// [`preload_sprite_archive_entries`](crate::config::AssetsConfig::preload_sprite_archive_entries)
    /// is set; all other entries are read from the archive on demand.
    pub fn crawl_archive(&mut self, archive: &Utf8Path) -> Result<usize> {
        let file = File::open(archive.as_std_path())?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;

        let preload = self.config().preload_sprite_archive_entries;
        let sprite_prefix = self.config().sprite_prefix.clone();

        let mut staged = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let name = entry.name().to_string();

            if entry.is_dir() {
                let key = name.trim_end_matches('/').to_string();
                if key.is_empty() {
                    continue;
                }
                let metadata =
                    AssetMetadata::archive_entry(archive, name, None).with_kind(AssetKind::Directory);
                staged.push((key, metadata));
                continue;
            }

            let data = if preload && name.starts_with(&sprite_prefix) {
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                Some(bytes)
            } else {
                None
            };

            staged.push((name.clone(), AssetMetadata::archive_entry(archive, name, data)));
        }

        tracing::info!("Crawled {} entries from archive {}", staged.len(), archive);
        Ok(self.commit(staged))
    }

    /// Map the resources of a module whose name contains the content marker.
    ///
    /// `MyMod.Content.sprites/hero.png` is mapped as `sprites/hero.png`: everything up to
    /// and including the marker and the separator that follows it is removed.
    pub fn crawl_resources(&mut self, resources: Arc<dyn ResourceSet>) -> usize {
        let marker = self.config().content_marker.clone();

        let mut staged = Vec::new();
        for name in resources.resource_names() {
            let Some(index) = name.find(&marker) else {
                continue;
            };
            let rest = &name[index + marker.len()..];
            let mut chars = rest.chars();
            chars.next();
            let rel = chars.as_str();
            if rel.is_empty() {
                continue;
            }

            staged.push((
                rel.to_string(),
                AssetMetadata::embedded(resources.clone(), name.clone()),
            ));
        }

        tracing::info!(
            "Crawled {} resources from module {}",
            staged.len(),
            resources.module_name()
        );
        self.commit(staged)
    }

    fn commit(&mut self, staged: Vec<(String, AssetMetadata)>) -> usize {
        let count = staged.len();
        for (path, metadata) in staged {
            self.add_mapping(&path, metadata);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetsConfig;
    use crate::metadata::{Container, EmbeddedResources};
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    fn create_resources_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("sprites/hero")).unwrap();
        fs::write(root.join("sprites/hero/hero_idle_0.png"), b"idle0").unwrap();
        fs::write(root.join("sprites/hero/hero_idle_1.png"), b"idle1").unwrap();
        fs::write(root.join("items.json"), b"{}").unwrap();

        fs::create_dir_all(root.join("DUMP/sprites")).unwrap();
        fs::write(root.join("DUMP/sprites/dumped.png"), b"dumped").unwrap();

        dir
    }

    #[test]
    fn test_crawl_dir() {
        let dir = create_resources_dir();
        let root = utf8(dir.path());
        let mut map = AssetMap::default();

        let added = map.crawl_dir(&root).unwrap();
        // sprites, sprites/hero, two frames, items.json
        assert_eq!(added, 5);

        assert!(map.resolve("sprites/hero/hero_idle_0", false).is_some());
        assert!(map.resolve("items.json", false).is_some());
        assert!(map.resolve("sprites/hero", true).is_some());
        assert!(map.resolve("sprites/hero", false).is_none());

        // The dump directory is skipped entirely.
        assert!(map.resolve("DUMP", true).is_none());
        assert!(map.resolve("DUMP/sprites/dumped", false).is_none());

        assert_eq!(map.sprite_collection("hero").unwrap().unprocessed_count(), 2);

        let bytes = map
            .resolve("SPRITES/HERO/HERO_IDLE_1", false)
            .unwrap()
            .read_all()
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"idle1".to_vec());
    }

    #[test]
    fn test_crawl_dir_missing_root() {
        let dir = tempdir().unwrap();
        let root = utf8(&dir.path().join("missing"));
        let mut map = AssetMap::default();

        assert!(matches!(map.crawl_dir(&root), Err(Error::InvalidRoot(_))));
        assert!(map.is_empty());
    }

    #[test]
    fn test_later_crawl_overrides_earlier() {
        let first = create_resources_dir();
        let second = tempdir().unwrap();
        fs::write(second.path().join("items.json"), b"{\"override\":true}").unwrap();

        let mut map = AssetMap::default();
        map.crawl_dir(&utf8(first.path())).unwrap();
        map.crawl_dir(&utf8(second.path())).unwrap();

        let bytes = map.resolve("items.json", false).unwrap().read_all().unwrap().unwrap();
        assert_eq!(bytes, b"{\"override\":true}".to_vec());
    }

    fn create_mod_archive(dir: &std::path::Path) -> Utf8PathBuf {
        let path = dir.join("mod.zip");
        let file = fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        zip.add_directory("sprites/", options).unwrap();
        zip.add_directory("sprites/hero/", options).unwrap();
        zip.start_file("sprites/hero/hero_fire_0.png", options).unwrap();
        zip.write_all(b"fire0").unwrap();
        zip.start_file("data/items.json", options).unwrap();
        zip.write_all(b"[]").unwrap();
        zip.finish().unwrap();

        utf8(&path)
    }

    #[test]
    fn test_crawl_archive() {
        let dir = tempdir().unwrap();
        let archive = create_mod_archive(dir.path());
        let mut map = AssetMap::default();

        assert_eq!(map.crawl_archive(&archive).unwrap(), 4);

        let frame = map.resolve("sprites/hero/hero_fire_0", false).unwrap();
        assert!(frame.is_cached());
        assert_eq!(frame.read_all().unwrap().unwrap(), b"fire0".to_vec());

        let data = map.resolve("data/items.json", false).unwrap();
        assert!(!data.is_cached());
        assert!(matches!(data.container(), Container::Archive { .. }));
        assert_eq!(data.read_all().unwrap().unwrap(), b"[]".to_vec());

        assert!(map.resolve("sprites/hero", true).is_some());
        assert_eq!(map.sprite_collection("hero").unwrap().len(), 1);
    }

    #[test]
    fn test_crawl_archive_without_preload() {
        let dir = tempdir().unwrap();
        let archive = create_mod_archive(dir.path());
        let mut map = AssetMap::new(AssetsConfig {
            preload_sprite_archive_entries: false,
            ..AssetsConfig::default()
        });

        map.crawl_archive(&archive).unwrap();
        let frame = map.resolve("sprites/hero/hero_fire_0", false).unwrap();
        assert!(!frame.is_cached());
        assert_eq!(frame.read_all().unwrap().unwrap(), b"fire0".to_vec());
    }

    #[test]
    fn test_corrupt_archive_leaves_map_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.zip");
        fs::write(&path, b"definitely not a zip file").unwrap();

        let mut map = AssetMap::default();
        map.add_mapping("items.json", AssetMetadata::file("items.json"));

        assert!(map.crawl_archive(&utf8(&path)).is_err());
        assert_eq!(map.len(), 1);
        assert_eq!(map.dir_count(), 0);
    }

    #[test]
    fn test_crawl_resources() {
        let resources = Arc::new(
            EmbeddedResources::new("HeroMod")
                .with_resource("HeroMod.Content.sprites/hero/hero_idle_0.png", b"idle0".to_vec())
                .with_resource("HeroMod.Content.items.json", b"{}".to_vec())
                .with_resource("HeroMod.Properties.Resources", b"ignored".to_vec()),
        );

        let mut map = AssetMap::default();
        assert_eq!(map.crawl_resources(resources), 2);

        let frame = map.resolve("sprites/hero/hero_idle_0", false).unwrap();
        assert_eq!(frame.read_all().unwrap().unwrap(), b"idle0".to_vec());
        assert!(map.resolve("items.json", false).is_some());
        assert_eq!(map.sprite_collection("hero").unwrap().len(), 1);
    }
}

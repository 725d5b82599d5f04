//! Asset descriptors: where the bytes of an overlay asset live and how to read them.
//!
//! An [`AssetMetadata`] is created once when an asset is discovered (while crawling a
//! resources directory, a mod archive or an embedded resource set) and is immutable
//! afterwards, except for the raw-byte cache which can be filled once.

use crate::error::Result;
use crate::limited::LimitedStream;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use zip::ZipArchive;

/// Seekable byte source returned by asset backends.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Semantic kind of an overlay asset.
///
/// Decided once when the asset is mapped, either explicitly by whoever creates the
/// descriptor or inferred from the path's extension (see [`AssetKind::from_path`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    /// Anything without a recognized extension.
    Generic,
    /// An image that replaces a texture or a sprite frame.
    Texture,
    /// A directory marker. Carries no payload.
    Directory,
}

/// Extensions that are stripped from a path and turned into an [`AssetKind`].
const EXTENSION_KINDS: &[(&str, AssetKind)] = &[(".png", AssetKind::Texture)];

impl AssetKind {
    /// Infer the kind of `path` from its extension.
    ///
    /// Returns the path with the recognized extension removed, together with the
    /// inferred kind. Unrecognized paths are returned unchanged as [`AssetKind::Generic`].
    pub fn from_path(path: &str) -> (&str, AssetKind) {
        for (extension, kind) in EXTENSION_KINDS {
            if let Some(stem) = path.strip_suffix(extension) {
                return (stem, *kind);
            }
        }
        (path, AssetKind::Generic)
    }
}

/// A set of named resources compiled into (or shipped alongside) a module.
///
/// This is the boundary to the host's embedded-resource mechanism: it lists resource
/// names and opens a resource by name.
pub trait ResourceSet: Send + Sync {
    /// Name of the module that owns the resources.
    fn module_name(&self) -> &str;

    /// All resource names, in the module's own naming scheme.
    fn resource_names(&self) -> Vec<String>;

    /// Open a resource by name, or `None` if it doesn't exist.
    fn open_resource(&self, name: &str) -> Option<Box<dyn ReadSeek>>;
}

/// In-memory [`ResourceSet`], e.g. built from `include_bytes!` blobs.
#[derive(Debug, Default, Clone)]
pub struct EmbeddedResources {
    module: String,
    resources: HashMap<String, Arc<[u8]>>,
}

impl EmbeddedResources {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            resources: HashMap::new(),
        }
    }

    /// Add (or replace) a named resource.
    pub fn with_resource(mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.resources.insert(name.into(), bytes.into());
        self
    }
}

impl ResourceSet for EmbeddedResources {
    fn module_name(&self) -> &str {
        &self.module
    }

    fn resource_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    fn open_resource(&self, name: &str) -> Option<Box<dyn ReadSeek>> {
        let bytes = self.resources.get(name)?.clone();
        Some(Box::new(Cursor::new(bytes)))
    }
}

/// Backend that holds the bytes of an asset.
#[derive(Clone)]
pub enum Container {
    /// A plain file on disk.
    Filesystem { path: Utf8PathBuf },
    /// An entry inside a zip archive.
    Archive { archive: Utf8PathBuf, entry: String },
    /// A resource inside a module's [`ResourceSet`].
    Embedded {
        resources: Arc<dyn ResourceSet>,
        name: String,
    },
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Filesystem { path } => f.debug_struct("Filesystem").field("path", path).finish(),
            Container::Archive { archive, entry } => f
                .debug_struct("Archive")
                .field("archive", archive)
                .field("entry", entry)
                .finish(),
            Container::Embedded { resources, name } => f
                .debug_struct("Embedded")
                .field("module", &resources.module_name())
                .field("name", name)
                .finish(),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Filesystem { path } => write!(f, "file {}", path),
            Container::Archive { archive, entry } => write!(f, "zip {}!{}", archive, entry),
            Container::Embedded { resources, name } => {
                write!(f, "resource {}!{}", resources.module_name(), name)
            }
        }
    }
}

/// Descriptor of a single overlay asset.
#[derive(Debug, Clone)]
pub struct AssetMetadata {
    container: Container,
    kind: Option<AssetKind>,
    raw_data: Option<Arc<[u8]>>,
    offset: u64,
    length: u64,
}

impl AssetMetadata {
    /// A file on disk. The kind is inferred when the asset is mapped.
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Container::Filesystem { path: path.into() })
    }

    /// An entry of a zip archive. `raw_data` is the already extracted entry, if any.
    pub fn archive_entry(
        archive: impl Into<Utf8PathBuf>,
        entry: impl Into<String>,
        raw_data: Option<Vec<u8>>,
    ) -> Self {
        let mut metadata = Self::new(Container::Archive {
            archive: archive.into(),
            entry: entry.into(),
        });
        metadata.raw_data = raw_data.map(Arc::from);
        metadata
    }

    /// A named resource of a module.
    pub fn embedded(resources: Arc<dyn ResourceSet>, name: impl Into<String>) -> Self {
        Self::new(Container::Embedded {
            resources,
            name: name.into(),
        })
    }

    /// A directory marker rooted at `path`.
    pub fn directory(path: impl Into<Utf8PathBuf>) -> Self {
        Self::file(path).with_kind(AssetKind::Directory)
    }

    fn new(container: Container) -> Self {
        Self {
            container,
            kind: None,
            raw_data: None,
            offset: 0,
            length: 0,
        }
    }

    /// Set the asset kind explicitly instead of inferring it from the path.
    pub fn with_kind(mut self, kind: AssetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict reads to `[offset, offset + length)`. A `length` of 0 means unrestricted.
    pub fn with_range(mut self, offset: u64, length: u64) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Whether both descriptors read the same bytes: same backend location and
    /// same window.
    pub fn same_source(&self, other: &AssetMetadata) -> bool {
        let same_container = match (&self.container, &other.container) {
            (Container::Filesystem { path: a }, Container::Filesystem { path: b }) => a == b,
            (
                Container::Archive { archive: a, entry: ea },
                Container::Archive { archive: b, entry: eb },
            ) => a == b && ea == eb,
            (
                Container::Embedded { resources: a, name: na },
                Container::Embedded { resources: b, name: nb },
            ) => a.module_name() == b.module_name() && na == nb,
            _ => false,
        };
        same_container && self.offset == other.offset && self.length == other.length
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The asset kind, or `None` while it has not been decided yet.
    pub fn kind(&self) -> Option<AssetKind> {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: AssetKind) {
        self.kind = Some(kind);
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Directory markers never have a payload; every other asset might.
    pub fn has_data(&self) -> bool {
        self.kind != Some(AssetKind::Directory)
    }

    pub fn is_cached(&self) -> bool {
        self.raw_data.is_some()
    }

    /// Fill the raw-byte cache from the backend if it is still empty.
    ///
    /// Once filled, the cache is never refreshed.
    pub fn cache_data(&mut self) -> Result<()> {
        if self.raw_data.is_some() || !self.has_data() {
            return Ok(());
        }
        if let Some(stream) = self.open_backend()? {
            self.raw_data = Some(Arc::from(drain(stream)?));
        }
        Ok(())
    }

    /// Open a stream over the asset's bytes, positioned at 0.
    ///
    /// Returns `Ok(None)` for directory markers, missing archive entries and missing
    /// embedded resources. A missing file on disk is an error, as is an unreadable
    /// archive.
    pub fn open_stream(&self) -> Result<Option<AssetStream>> {
        if !self.has_data() {
            return Ok(None);
        }

        let stream = match &self.raw_data {
            Some(raw) => Some(Box::new(Cursor::new(raw.clone())) as Box<dyn ReadSeek>),
            None => self.open_backend()?,
        };

        Ok(stream.map(|stream| {
            if self.length == 0 {
                AssetStream::Full(stream)
            } else {
                AssetStream::Limited(LimitedStream::new(stream, self.offset, self.length))
            }
        }))
    }

    /// Read the asset's (clipped) contents.
    ///
    /// A cached raw buffer is copied without touching any backend. Otherwise the
    /// stream is opened and drained; range-restricted streams hand over their window
    /// buffer directly.
    pub fn read_all(&self) -> Result<Option<Vec<u8>>> {
        if !self.has_data() {
            return Ok(None);
        }

        if let Some(raw) = &self.raw_data {
            return Ok(Some(self.clip(raw).to_vec()));
        }

        match self.open_stream()? {
            Some(AssetStream::Limited(limited)) => Ok(Some(limited.into_buffer()?)),
            Some(AssetStream::Full(stream)) => Ok(Some(drain(stream)?)),
            None => Ok(None),
        }
    }

    fn clip<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        if self.length == 0 {
            return raw;
        }
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(raw.len());
        let end = start
            .saturating_add(usize::try_from(self.length).unwrap_or(usize::MAX))
            .min(raw.len());
        &raw[start..end]
    }

    fn open_backend(&self) -> Result<Option<Box<dyn ReadSeek>>> {
        match &self.container {
            Container::Filesystem { path } => {
                let file = File::open(path.as_std_path())?;
                Ok(Some(Box::new(BufReader::new(file))))
            }
            Container::Archive { archive, entry } => {
                Ok(extract_archive_entry(archive, entry)?
                    .map(|bytes| Box::new(Cursor::new(bytes)) as Box<dyn ReadSeek>))
            }
            Container::Embedded { resources, name } => Ok(resources.open_resource(name)),
        }
    }
}

/// Open `archive` and extract `entry` into memory.
///
/// The archive handle is dropped before returning. Returns `Ok(None)` if the
/// archive has no such entry.
pub fn extract_archive_entry(archive: &Utf8Path, entry: &str) -> Result<Option<Vec<u8>>> {
    let file = File::open(archive.as_std_path())?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let mut zip_entry = match zip.by_name(entry) {
        Ok(zip_entry) => zip_entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    zip_entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn drain(mut stream: impl Read) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Stream returned by [`AssetMetadata::open_stream`].
pub enum AssetStream {
    /// The whole backing stream.
    Full(Box<dyn ReadSeek>),
    /// A window of the backing stream.
    Limited(LimitedStream<Box<dyn ReadSeek>>),
}

impl AssetStream {
    /// Length of the readable content.
    pub fn len(&mut self) -> io::Result<u64> {
        match self {
            AssetStream::Full(stream) => {
                let current = stream.stream_position()?;
                let end = stream.seek(SeekFrom::End(0))?;
                stream.seek(SeekFrom::Start(current))?;
                Ok(end)
            }
            AssetStream::Limited(limited) => Ok(limited.len()),
        }
    }
}

impl Read for AssetStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            AssetStream::Full(stream) => stream.read(buf),
            AssetStream::Limited(limited) => limited.read(buf),
        }
    }
}

impl Seek for AssetStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            AssetStream::Full(stream) => stream.seek(pos),
            AssetStream::Limited(limited) => limited.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn hundred_bytes() -> Vec<u8> {
        (0u8..100).collect()
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            AssetKind::from_path("sprites/hero/idle.png"),
            ("sprites/hero/idle", AssetKind::Texture)
        );
        assert_eq!(
            AssetKind::from_path("data/items.json"),
            ("data/items.json", AssetKind::Generic)
        );
    }

    #[test]
    fn test_file_read_all_and_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, hundred_bytes()).unwrap();
        let path = Utf8PathBuf::from_path_buf(path).unwrap();

        let full = AssetMetadata::file(path.clone());
        assert_eq!(full.read_all().unwrap().unwrap(), hundred_bytes());

        let clipped = AssetMetadata::file(path).with_range(10, 5);
        assert_eq!(
            clipped.read_all().unwrap().unwrap(),
            vec![10, 11, 12, 13, 14]
        );

        let mut stream = clipped.open_stream().unwrap().unwrap();
        assert_eq!(stream.len().unwrap(), 5);
    }

    #[test]
    fn test_window_larger_than_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, hundred_bytes()).unwrap();
        let path = Utf8PathBuf::from_path_buf(path).unwrap();

        let clipped = AssetMetadata::file(path).with_range(10, u64::MAX);
        let bytes = clipped.read_all().unwrap().unwrap();
        assert_eq!(bytes.len(), 90);
        assert_eq!(bytes, hundred_bytes()[10..].to_vec());

        let cached = AssetMetadata::archive_entry("missing.zip", "a.bin", Some(hundred_bytes()))
            .with_range(10, u64::MAX);
        assert_eq!(cached.read_all().unwrap().unwrap().len(), 90);
    }

    #[test]
    fn test_same_source() {
        let a = AssetMetadata::file("atlas.png");
        assert!(a.same_source(&AssetMetadata::file("atlas.png")));
        assert!(!a.same_source(&AssetMetadata::file("other.png")));
        assert!(!a.same_source(&AssetMetadata::file("atlas.png").with_range(4, 8)));
        assert!(!a.same_source(&AssetMetadata::archive_entry("atlas.png", "atlas.png", None)));

        let resources: Arc<dyn ResourceSet> = Arc::new(EmbeddedResources::new("core"));
        let embedded = AssetMetadata::embedded(resources.clone(), "atlas.png");
        assert!(embedded.same_source(&AssetMetadata::embedded(resources, "atlas.png")));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("missing.png")).unwrap();
        let metadata = AssetMetadata::file(path);
        assert!(metadata.open_stream().is_err());
    }

    #[test]
    fn test_directory_has_no_payload() {
        let metadata = AssetMetadata::directory("sprites");
        assert!(!metadata.has_data());
        assert!(metadata.open_stream().unwrap().is_none());
        assert!(metadata.read_all().unwrap().is_none());
    }

    #[test]
    fn test_raw_data_is_copied_and_clipped() {
        let metadata = AssetMetadata::archive_entry("missing.zip", "a.bin", Some(hundred_bytes()));
        // The archive doesn't exist; the cached buffer must be used instead.
        assert_eq!(metadata.read_all().unwrap().unwrap(), hundred_bytes());

        let clipped = metadata.with_range(10, 5);
        assert_eq!(clipped.read_all().unwrap().unwrap(), vec![10, 11, 12, 13, 14]);

        let mut stream = clipped.open_stream().unwrap().unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_archive_entry_extraction() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("mod.zip");
        {
            let file = File::create(&zip_path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            zip.start_file("data/blob.bin", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(&hundred_bytes()).unwrap();
            zip.finish().unwrap();
        }
        let zip_path = Utf8PathBuf::from_path_buf(zip_path).unwrap();

        let metadata = AssetMetadata::archive_entry(zip_path.clone(), "data/blob.bin", None);
        assert_eq!(metadata.read_all().unwrap().unwrap(), hundred_bytes());

        let missing = AssetMetadata::archive_entry(zip_path, "data/nope.bin", None);
        assert!(missing.open_stream().unwrap().is_none());
    }

    #[test]
    fn test_embedded_resource() {
        let resources = Arc::new(
            EmbeddedResources::new("MyMod").with_resource("MyMod.Content.a.txt", b"hello".to_vec()),
        );
        let metadata = AssetMetadata::embedded(resources.clone(), "MyMod.Content.a.txt");
        assert_eq!(metadata.read_all().unwrap().unwrap(), b"hello".to_vec());

        let missing = AssetMetadata::embedded(resources, "MyMod.Content.b.txt");
        assert!(missing.read_all().unwrap().is_none());
    }

    #[test]
    fn test_cache_data_fills_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, b"first").unwrap();
        let path = Utf8PathBuf::from_path_buf(path).unwrap();

        let mut metadata = AssetMetadata::file(path.clone());
        metadata.cache_data().unwrap();
        assert!(metadata.is_cached());

        std::fs::write(&path, b"second").unwrap();
        metadata.cache_data().unwrap();
        assert_eq!(metadata.read_all().unwrap().unwrap(), b"first".to_vec());
    }
}

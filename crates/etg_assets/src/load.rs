//! Host-facing load resolution.
//!
//! [`load`] is what a host's resource-load hook calls. It checks the overlay for
//! the requested path and only falls back to the host's own loader when no mod
//! provides the asset:
//!
//! 1. the exact path, directory markers included;
//! 2. `<path>.json`, a structured payload that fully replaces the host object;
//! 3. `<path>.patch.json`, a structured payload applied over the host object;
//! 4. the host loader, unmodified.
//!
//! Texture requests that hit a leaf are decoded straight from the descriptor's
//! bytes. Sprite-collection requests that hit a directory marker are assembled from
//! the textures mapped below it.

use crate::error::{Error, Result};
use crate::map::AssetMap;
use crate::metadata::{AssetKind, AssetMetadata, AssetStream};
use crate::sprites::{handle_sprites, SpriteCollection};
use image::{ImageFormat, RgbaImage};

/// Suffix of structured payloads that replace the host object.
pub const JSON_SUFFIX: &str = ".json";
/// Suffix of structured payloads that patch the host object.
pub const PATCH_SUFFIX: &str = ".patch.json";

/// The type of object the host asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Any object. A texture leaf is still decoded as a texture.
    Any,
    Texture,
    SpriteCollection,
    /// Any other concrete type, which the overlay only serves through JSON payloads.
    Other,
}

/// The host's side of asset loading.
pub trait AssetHost {
    /// The host's loaded-object type.
    type Object;

    /// Load `path` with the host's own loader, bypassing the overlay.
    fn host_load(&mut self, path: &str, kind: RequestKind) -> Option<Self::Object>;

    /// Decode a structured payload into a new object.
    fn decode_full(&mut self, path: &str, stream: AssetStream) -> Result<Self::Object>;

    /// Apply a structured patch over `existing`, the host's own object for the path.
    fn apply_patch(
        &mut self,
        path: &str,
        stream: AssetStream,
        existing: Option<Self::Object>,
    ) -> Result<Self::Object>;

    /// Decode image bytes into a texture object.
    fn decode_image(&mut self, path: &str, bytes: Vec<u8>) -> Result<Self::Object>;

    /// Turn an overlay-built sprite collection into a host object.
    ///
    /// Hosts without sprite collections keep the default, which lets the request
    /// fall through to [`host_load`](Self::host_load).
    fn build_sprite_collection(&mut self, _collection: SpriteCollection) -> Option<Self::Object> {
        None
    }
}

enum Payload {
    Exact,
    Full,
    Patch,
}

/// Resolve a host load request against the overlay.
///
/// Returns whatever the host loader returns when the overlay has nothing to
/// offer. Errors come from reading the mapped payload or from the host's decoders.
pub fn load<H: AssetHost>(
    map: &mut AssetMap,
    host: &mut H,
    path: &str,
    kind: RequestKind,
) -> Result<Option<H::Object>> {
    let Some((metadata, payload)) = find_payload(map, path) else {
        return Ok(host.host_load(path, kind));
    };

    match payload {
        Payload::Full => {
            if let Some(stream) = metadata.open_stream()? {
                tracing::debug!("Loading {} from {}{}", path, path, JSON_SUFFIX);
                return host.decode_full(path, stream).map(Some);
            }
        }
        Payload::Patch => {
            if let Some(stream) = metadata.open_stream()? {
                tracing::debug!("Patching {} with {}{}", path, path, PATCH_SUFFIX);
                let existing = host.host_load(path, kind);
                return host.apply_patch(path, stream, existing).map(Some);
            }
        }
        Payload::Exact => {
            if kind == RequestKind::SpriteCollection
                && metadata.kind() == Some(AssetKind::Directory)
            {
                let name = path
                    .strip_prefix(map.config().sprite_prefix.as_str())
                    .unwrap_or(path);
                let mut collection = SpriteCollection::new(name, Vec::new());
                handle_sprites(map, &mut collection);
                if let Some(object) = host.build_sprite_collection(collection) {
                    return Ok(Some(object));
                }
            }

            let wants_texture = kind == RequestKind::Texture
                || (kind == RequestKind::Any && metadata.kind() == Some(AssetKind::Texture));
            if wants_texture {
                if let Some(bytes) = metadata.read_all()? {
                    tracing::debug!("Decoding {} from {}", path, metadata.container());
                    return host.decode_image(path, bytes).map(Some);
                }
            }
        }
    }

    Ok(host.host_load(path, kind))
}

fn find_payload(map: &AssetMap, path: &str) -> Option<(AssetMetadata, Payload)> {
    if let Some(metadata) = map.resolve(path, true) {
        return Some((metadata.clone(), Payload::Exact));
    }
    if let Some(metadata) = map.resolve(&format!("{}{}", path, JSON_SUFFIX), false) {
        return Some((metadata.clone(), Payload::Full));
    }
    map.resolve(&format!("{}{}", path, PATCH_SUFFIX), false)
        .map(|metadata| (metadata.clone(), Payload::Patch))
}

/// Decode PNG bytes into an RGBA image.
///
/// A ready-made [`AssetHost::decode_image`] for hosts that work with plain pixels.
pub fn decode_png(path: &str, bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
        Error::Decode {
            path: path.to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(image.to_rgba8())
}

//! Path normalization helpers shared by the overlay and the crawlers.

/// Normalize path separators to forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Case-insensitive lookup key for an overlay path.
///
/// Separators are normalized as well, so `Sprites\Hero` and `sprites/hero` collide.
pub fn overlay_key(path: &str) -> String {
    normalize_separators(path).to_lowercase()
}

/// Split `sprites/<group>/<rest>` into the group name.
///
/// Returns `None` if `path` doesn't start with `prefix` or has no second separator,
/// i.e. the group must be followed by at least one more segment.
pub fn sprite_group<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    let end = rest.find('/')?;
    Some(&rest[..end])
}

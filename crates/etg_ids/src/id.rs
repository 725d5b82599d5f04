use crate::error::{IdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

/// Namespace used for ids written without one.
pub const DEFAULT_NAMESPACE: &str = "gungeon";

/// The two halves of a `namespace:name` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdEntry {
    pub namespace: String,
    pub name: String,
}

impl Display for IdEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Fail if `id` has more than one colon.
pub fn verify_id(id: &str) -> Result<()> {
    if id.matches(':').count() > 1 {
        return Err(IdError::BadlyFormattedId(id.to_string()));
    }
    Ok(())
}

/// Normalize `id` to `namespace:name`.
///
/// Surrounding whitespace is trimmed and ids without a namespace get the
/// [`DEFAULT_NAMESPACE`].
///
/// ```
/// assert_eq!(etg_ids::resolve(" sword ").unwrap(), "gungeon:sword");
/// assert_eq!(etg_ids::resolve("mymod:sword").unwrap(), "mymod:sword");
/// assert!(etg_ids::resolve("a:b:c").is_err());
/// ```
pub fn resolve(id: &str) -> Result<String> {
    let id = id.trim();
    if id.contains(':') {
        verify_id(id)?;
        Ok(id.to_string())
    } else {
        Ok(format!("{}:{}", DEFAULT_NAMESPACE, id))
    }
}

/// Split a fully qualified id into namespace and name.
///
/// Unlike [`resolve`], the id must already contain exactly one colon.
pub fn split(id: &str) -> Result<IdEntry> {
    verify_id(id)?;
    match id.split_once(':') {
        Some((namespace, name)) => Ok(IdEntry {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }),
        None => Err(IdError::BadlyFormattedId(id.to_string())),
    }
}

/// Storage key of an [`IdPool`](crate::IdPool).
///
/// Two keys are equal when namespace and name are. `full` keeps the id as it was
/// written (after trimming), or the qualified form for default-namespace ids.
#[derive(Debug, Clone)]
pub struct NamespacedId {
    namespace: String,
    name: String,
    full: String,
}

impl NamespacedId {
    /// Parse a raw id, rejecting whitespace inside it and extra colons.
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.chars().any(char::is_whitespace) {
            return Err(IdError::BadIdElement(id.to_string()));
        }

        let Some((namespace, name)) = id.split_once(':') else {
            return Ok(Self {
                namespace: DEFAULT_NAMESPACE.to_string(),
                name: id.to_string(),
                full: format!("{}:{}", DEFAULT_NAMESPACE, id),
            });
        };
        if name.contains(':') {
            return Err(IdError::BadlyFormattedId(id.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            full: id.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_id(&self) -> &str {
        &self.full
    }
}

impl PartialEq for NamespacedId {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for NamespacedId {}

impl Hash for NamespacedId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.name.hash(state);
    }
}

impl Display for NamespacedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

use crate::error::{IdError, Result};
use crate::id::NamespacedId;
use std::collections::{HashMap, HashSet};
use std::fmt;

type Disposer<T> = Box<dyn Fn(T) + Send + Sync>;

/// Registry of values keyed by `namespace:name` ids.
///
/// Namespaces can be locked, after which no value in them can be added, replaced or
/// removed. Locks are permanent for the lifetime of the pool.
pub struct IdPool<T> {
    storage: HashMap<NamespacedId, T>,
    locked: HashSet<String>,
    namespaces: HashSet<String>,
    disposer: Option<Disposer<T>>,
}

impl<T> Default for IdPool<T> {
    fn default() -> Self {
        Self {
            storage: HashMap::new(),
            locked: HashSet::new(),
            namespaces: HashSet::new(),
            disposer: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IdPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdPool")
            .field("storage", &self.storage)
            .field("locked", &self.locked)
            .field("namespaces", &self.namespaces)
            .field("disposer", &self.disposer.is_some())
            .finish()
    }
}

impl<T> IdPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand values removed with `destroy = true` to `disposer`.
    pub fn with_disposer(mut self, disposer: impl Fn(T) + Send + Sync + 'static) -> Self {
        self.disposer = Some(Box::new(disposer));
        self
    }

    pub fn lock_namespace(&mut self, namespace: impl Into<String>) {
        self.locked.insert(namespace.into());
    }

    pub fn namespace_is_locked(&self, namespace: &str) -> bool {
        self.locked.contains(namespace)
    }

    /// Insert a value under a new id.
    pub fn add(&mut self, id: &str, value: T) -> Result<()> {
        self.insert(id, value, true)
    }

    /// Insert a value, replacing any value already stored under the id.
    pub fn set(&mut self, id: &str, value: T) -> Result<()> {
        self.insert(id, value, false)
    }

    fn insert(&mut self, id: &str, value: T, fail_on_exists: bool) -> Result<()> {
        tracing::trace!("Setting {}", id);
        let key = NamespacedId::parse(id)?;
        self.ensure_unlocked(key.namespace())?;

        if fail_on_exists && self.storage.contains_key(&key) {
            return Err(IdError::ItemIdExists(id.to_string()));
        }

        self.namespaces.insert(key.namespace().to_string());
        self.storage.insert(key, value);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&T> {
        let key = NamespacedId::parse(id)?;
        self.storage
            .get(&key)
            .ok_or_else(|| IdError::NonExistentId(key.full_id().to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut T> {
        let key = NamespacedId::parse(id)?;
        match self.storage.get_mut(&key) {
            Some(value) => Ok(value),
            None => Err(IdError::NonExistentId(key.full_id().to_string())),
        }
    }

    /// Remove the value stored under `id`.
    ///
    /// With `destroy` and a disposer configured, the value is passed to the disposer
    /// and `None` is returned. Otherwise the value is handed back to the caller.
    pub fn remove(&mut self, id: &str, destroy: bool) -> Result<Option<T>> {
        let key = NamespacedId::parse(id)?;
        self.ensure_unlocked(key.namespace())?;

        let value = self
            .storage
            .remove(&key)
            .ok_or_else(|| IdError::NonExistentId(id.to_string()))?;

        match (&self.disposer, destroy) {
            (Some(disposer), true) => {
                disposer(value);
                Ok(None)
            }
            _ => Ok(Some(value)),
        }
    }

    /// Move the value stored under `source` to `target`.
    ///
    /// Only the target namespace's lock is checked, so values can be moved out of a
    /// locked namespace. A value already stored under `target` is replaced.
    pub fn rename(&mut self, source: &str, target: &str) -> Result<()> {
        tracing::trace!("Renaming {} -> {}", source, target);
        let target_key = NamespacedId::parse(target)?;
        self.ensure_unlocked(target_key.namespace())?;

        let source_key = NamespacedId::parse(source)?;
        let value = self
            .storage
            .remove(&source_key)
            .ok_or_else(|| IdError::NonExistentId(source.to_string()))?;

        self.namespaces.insert(target_key.namespace().to_string());
        self.storage.insert(target_key, value);
        Ok(())
    }

    pub fn contains_id(&self, id: &str) -> Result<bool> {
        Ok(self.storage.contains_key(&NamespacedId::parse(id)?))
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Every stored id, as written when it was inserted.
    pub fn all_ids(&self) -> Vec<String> {
        self.ids().map(str::to_string).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.storage.keys().map(NamespacedId::full_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.storage.values()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &T)> {
        self.storage.iter().map(|(key, value)| (key.full_id(), value))
    }

    /// Every namespace that ever received a value.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    fn ensure_unlocked(&self, namespace: &str) -> Result<()> {
        if self.locked.contains(namespace) {
            return Err(IdError::LockedNamespace(namespace.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_add_and_get() {
        let mut pool = IdPool::new();
        pool.add("sword", 1).unwrap();
        pool.add("mymod:sword", 2).unwrap();

        assert_eq!(*pool.get("gungeon:sword").unwrap(), 1);
        assert_eq!(*pool.get(" sword ").unwrap(), 1);
        assert_eq!(*pool.get("mymod:sword").unwrap(), 2);
        assert_eq!(pool.len(), 2);

        assert_eq!(
            pool.add("gungeon:sword", 3),
            Err(IdError::ItemIdExists("gungeon:sword".to_string()))
        );
        assert_eq!(
            pool.get("mymod:shield"),
            Err(IdError::NonExistentId("mymod:shield".to_string()))
        );
        assert_eq!(
            pool.add("big sword", 4),
            Err(IdError::BadIdElement("big sword".to_string()))
        );
        assert!(matches!(pool.add("a:b:c", 5), Err(IdError::BadlyFormattedId(_))));
    }

    #[test]
    fn test_set_replaces() {
        let mut pool = IdPool::new();
        pool.set("sword", 1).unwrap();
        pool.set("sword", 2).unwrap();
        *pool.get_mut("sword").unwrap() += 1;
        assert_eq!(*pool.get("sword").unwrap(), 3);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_locked_namespace() {
        let mut pool = IdPool::new();
        pool.add("core:x", 1).unwrap();
        pool.lock_namespace("core");
        pool.lock_namespace("core");

        assert!(pool.namespace_is_locked("core"));
        assert_eq!(
            pool.add("core:y", 2),
            Err(IdError::LockedNamespace("core".to_string()))
        );
        assert!(matches!(pool.set("core:x", 2), Err(IdError::LockedNamespace(_))));
        assert!(matches!(pool.remove("core:x", false), Err(IdError::LockedNamespace(_))));
        assert_eq!(*pool.get("core:x").unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let mut pool = IdPool::new();
        pool.add("mymod:sword", 1).unwrap();

        assert_eq!(pool.remove("mymod:sword", true).unwrap(), Some(1));
        assert!(pool.is_empty());
        assert_eq!(
            pool.remove("mymod:sword", true),
            Err(IdError::NonExistentId("mymod:sword".to_string()))
        );
    }

    #[test]
    fn test_remove_with_disposer() {
        let disposed = Arc::new(Mutex::new(Vec::new()));
        let sink = disposed.clone();
        let mut pool = IdPool::new().with_disposer(move |value: String| {
            sink.lock().unwrap().push(value);
        });
        pool.add("a", "first".to_string()).unwrap();
        pool.add("b", "second".to_string()).unwrap();

        assert_eq!(pool.remove("a", true).unwrap(), None);
        assert_eq!(pool.remove("b", false).unwrap(), Some("second".to_string()));
        assert_eq!(*disposed.lock().unwrap(), vec!["first".to_string()]);
    }

    #[test]
    fn test_rename() {
        let mut pool = IdPool::new();
        pool.add("old:sword", 7).unwrap();
        pool.rename("old:sword", "new:sword").unwrap();

        assert!(!pool.contains_id("old:sword").unwrap());
        assert_eq!(*pool.get("new:sword").unwrap(), 7);
        assert_eq!(
            pool.rename("old:sword", "new:other"),
            Err(IdError::NonExistentId("old:sword".to_string()))
        );
    }

    #[test]
    fn test_rename_checks_only_target_lock() {
        let mut pool = IdPool::new();
        pool.add("core:x", 1).unwrap();
        pool.add("mymod:y", 2).unwrap();
        pool.lock_namespace("core");

        assert_eq!(
            pool.rename("mymod:y", "core:y"),
            Err(IdError::LockedNamespace("core".to_string()))
        );

        // Moving out of a locked namespace is allowed.
        pool.rename("core:x", "mymod:x").unwrap();
        assert!(!pool.contains_id("core:x").unwrap());
        assert_eq!(*pool.get("mymod:x").unwrap(), 1);
    }

    #[test]
    fn test_enumeration() {
        let mut pool = IdPool::new();
        pool.add("sword", 1).unwrap();
        pool.add("mymod:shield", 2).unwrap();

        let mut ids = pool.all_ids();
        ids.sort();
        assert_eq!(ids, vec!["gungeon:sword", "mymod:shield"]);

        let mut values: Vec<i32> = pool.entries().copied().collect();
        values.sort();
        assert_eq!(values, vec![1, 2]);

        let mut pairs: Vec<(&str, i32)> = pool.pairs().map(|(id, v)| (id, *v)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("gungeon:sword", 1), ("mymod:shield", 2)]);

        pool.remove("mymod:shield", false).unwrap();
        let mut namespaces: Vec<&str> = pool.namespaces().collect();
        namespaces.sort();
        assert_eq!(namespaces, vec!["gungeon", "mymod"]);
    }
}

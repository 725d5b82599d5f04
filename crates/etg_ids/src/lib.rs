//! Namespaced identity registry for mods.
//!
//! Mods refer to items, enemies and other objects through ids of the form
//! `namespace:name`. Ids without a namespace belong to the game's own
//! [`DEFAULT_NAMESPACE`]. An [`IdPool`] stores one value per id and enforces namespace
//! locks, so the game's own entries can be protected once registration is done.
//!
//! # Example
//!
//! ```
//! use etg_ids::{IdError, IdPool};
//!
//! let mut items = IdPool::new();
//! items.add("sword", 1).unwrap();
//! items.lock_namespace("gungeon");
//!
//! assert_eq!(*items.get("gungeon:sword").unwrap(), 1);
//! assert!(matches!(items.add("shield", 2), Err(IdError::LockedNamespace(_))));
//! items.add("mymod:shield", 2).unwrap();
//! ```

mod error;
mod id;
mod pool;

pub use error::{IdError, Result};
pub use id::{resolve, split, verify_id, IdEntry, NamespacedId, DEFAULT_NAMESPACE};
pub use pool::IdPool;

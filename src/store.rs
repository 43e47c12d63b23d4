//! Model storage: the binding trait the runtime consumes and the keyed store.

#[cfg(feature = "no_std")]
use alloc::collections::BTreeMap;
#[cfg(not(feature = "no_std"))]
use std::collections::BTreeMap;

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use portable_atomic::{AtomicU64, Ordering};
use portable_atomic_util::Arc;
use spin::Mutex;

use crate::ElmishError;

/// Storage for the current model of one element instance.
///
/// The runtime reads the model when a drain starts and writes every model that
/// `update` returns. Nothing else writes it while the element runs.
///
/// Implemented by [`State`](crate::State) (a singleton slot) and [`Binding`] (one
/// key of a shared [`Store`]).
pub trait ModelStore<Model> {
    /// The current model, or `None` if none was stored yet.
    fn get(&self) -> Option<Model>;

    /// Replace the current model.
    fn put(&self, model: Model);

    /// Whether a model was stored. The runtime skips `init` when it was.
    fn exists(&self) -> bool;
}

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Key`], unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle addressing one model instance inside a [`Store`].
///
/// Keys are minted by [`Store::key`] and compare equal only to copies of
/// themselves: two keys minted separately never collide, whatever they are used
/// for.
pub struct Key<Model> {
    id: KeyId,
    _model: PhantomData<fn() -> Model>,
}

impl<Model> Key<Model> {
    fn mint() -> Self {
        Self {
            id: KeyId(NEXT_KEY.fetch_add(1, Ordering::Relaxed)),
            _model: PhantomData,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }
}

impl<Model> Clone for Key<Model> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Model> Copy for Key<Model> {}

impl<Model> PartialEq for Key<Model> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<Model> Eq for Key<Model> {}

impl<Model> Hash for Key<Model> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<Model> fmt::Debug for Key<Model> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.id).finish()
    }
}

/// Keyed model store shared by several element instances.
///
/// Clones share the same storage. Each instance is addressed by its own
/// [`Key`]; use [`bind`](Self::bind) to hand one key to a
/// [`Runtime`](crate::Runtime).
///
/// # Example
///
/// ```rust
/// use oxide_elmish::{ElmishError, Store};
///
/// let store = Store::new();
/// let key = store.key();
///
/// assert!(!store.exists(key));
/// assert_eq!(store.get(key), Err(ElmishError::KeyNotFound(key.id())));
///
/// store.put(key, 1);
/// store.put(key, 2);
/// assert_eq!(store.get(key), Ok(2));
/// ```
pub struct Store<Model> {
    slots: Arc<Mutex<BTreeMap<KeyId, Model>>>,
}

impl<Model> Clone for Store<Model> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<Model> Default for Store<Model> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Model> Store<Model> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Mint a fresh key.
    pub fn key(&self) -> Key<Model> {
        Key::mint()
    }

    /// Read the model stored under `key`.
    ///
    /// Fails with [`ElmishError::KeyNotFound`] if `key` was never written.
    pub fn get(&self, key: Key<Model>) -> Result<Model, ElmishError>
    where
        Model: Clone,
    {
        self.slots
            .lock()
            .get(&key.id)
            .cloned()
            .ok_or(ElmishError::KeyNotFound(key.id))
    }

    /// Store `model` under `key`, replacing any previous value.
    pub fn put(&self, key: Key<Model>, model: Model) {
        self.slots.lock().insert(key.id, model);
    }

    pub fn exists(&self, key: Key<Model>) -> bool {
        self.slots.lock().contains_key(&key.id)
    }

    /// Bind `key` for use as a runtime's [`ModelStore`].
    pub fn bind(&self, key: Key<Model>) -> Binding<Model> {
        Binding {
            store: self.clone(),
            key,
        }
    }
}

/// One key of a [`Store`], usable as a [`ModelStore`].
pub struct Binding<Model> {
    store: Store<Model>,
    key: Key<Model>,
}

impl<Model> Binding<Model> {
    pub fn key(&self) -> Key<Model> {
        self.key
    }
}

impl<Model: Clone> ModelStore<Model> for Binding<Model> {
    fn get(&self) -> Option<Model> {
        self.store.get(self.key).ok()
    }

    fn put(&self, model: Model) {
        self.store.put(self.key, model);
    }

    fn exists(&self) -> bool {
        self.store.exists(self.key)
    }
}

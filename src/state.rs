//! Singleton model storage.

use portable_atomic_util::Arc;
use spin::Mutex;

use crate::ModelStore;

/// Holder of a single model, the default store of a [`Runtime`](crate::Runtime).
///
/// Clones share the same slot, so a `State` kept outside the runtime observes
/// every model the runtime persists.
///
/// ```rust
/// use oxide_elmish::{ModelStore, State};
///
/// let state = State::new();
/// assert_eq!(state.get(), None);
///
/// state.put(1);
/// assert_eq!(state.get(), Some(1));
/// ```
pub struct State<Model> {
    value: Arc<Mutex<Option<Model>>>,
}

impl<Model> Clone for State<Model> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<Model> Default for State<Model> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Model> State<Model> {
    pub fn new() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
        }
    }
}

impl<Model: Clone> ModelStore<Model> for State<Model> {
    fn get(&self) -> Option<Model> {
        self.value.lock().clone()
    }

    fn put(&self, model: Model) {
        *self.value.lock() = Some(model);
    }

    fn exists(&self) -> bool {
        self.value.lock().is_some()
    }
}

//! Errors surfaced by the runtime and its stores.

use thiserror::Error;

use crate::store::KeyId;

/// Errors returned synchronously from [`Sender::send`](crate::Sender::send),
/// [`Runtime::use_element`](crate::Runtime::use_element) and [`Store::get`](crate::Store::get).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ElmishError {
    /// A drain found no model for its instance.
    ///
    /// The runtime never substitutes a default model.
    #[error("model is not initialized")]
    UninitializedModel,

    /// A keyed store was read with a key that was never written.
    #[error("key {0} not found in store")]
    KeyNotFound(KeyId),
}

//! FIFO message queue with a single push notification.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use flume::{Receiver, Sender};
use portable_atomic_util::Arc;
use spin::Mutex;

use crate::ElmishError;

type Notify = Arc<Box<dyn Fn() -> Result<(), ElmishError> + Send + Sync>>;

/// Ordered queue of pending messages.
///
/// Messages are appended at the tail and removed from the head. Clones share
/// the same underlying queue and notification slot.
///
/// At most one notification callback is registered at a time. It fires once
/// per [`push`](Self::push), after the message has landed in the queue, and the
/// slot is released before the call so the callback may push again. Such a
/// re-entrant push lands behind every message queued before it.
///
/// # Example
///
/// ```rust
/// use oxide_elmish::MessageQueue;
///
/// let queue = MessageQueue::new();
/// queue.push("first").unwrap();
/// queue.push("second").unwrap();
///
/// assert_eq!(queue.size(), 2);
/// assert_eq!(queue.pop(), Some("first"));
/// assert_eq!(queue.pop(), Some("second"));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct MessageQueue<Msg> {
    sender: Sender<Msg>,
    receiver: Receiver<Msg>,
    on_push: Arc<Mutex<Option<Notify>>>,
}

impl<Msg> Clone for MessageQueue<Msg> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            on_push: self.on_push.clone(),
        }
    }
}

impl<Msg> Default for MessageQueue<Msg> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Msg> MessageQueue<Msg> {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            on_push: Arc::new(Mutex::new(None)),
        }
    }

    /// Append `message` at the tail and fire the registered notification.
    ///
    /// Returns whatever the notification returns, or `Ok(())` when none is
    /// registered.
    pub fn push(&self, message: Msg) -> Result<(), ElmishError> {
        // The queue holds its own receiver, so the channel is never disconnected.
        self.sender.send(message).ok();

        let notify = self.on_push.lock().clone();
        match notify {
            Some(notify) => (**notify)(),
            None => Ok(()),
        }
    }

    /// Remove and return the head of the queue, or `None` when it is empty.
    pub fn pop(&self) -> Option<Msg> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending messages.
    pub fn size(&self) -> usize {
        self.receiver.len()
    }

    /// Replace the push notification.
    pub fn on_push<F>(&self, callback: F)
    where
        F: Fn() -> Result<(), ElmishError> + Send + Sync + 'static,
    {
        *self.on_push.lock() = Some(Arc::new(Box::new(callback)));
    }
}

//! The handle used to feed messages into a running element.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use portable_atomic_util::Arc;

use crate::ElmishError;

/// Entry point into one element's queue, implemented by the runtime.
pub(crate) trait Dispatch<Msg>: Send + Sync {
    fn dispatch(&self, message: Msg) -> Result<(), ElmishError>;

    fn dispatch_all(&self, messages: &mut dyn Iterator<Item = Msg>) -> Result<(), ElmishError>;
}

/// Message sender returned by [`Runtime::use_element`](crate::Runtime::use_element).
///
/// `send` only enqueues. Processing happens through the runtime's drain loop,
/// which is started by the push unless a drain is already running, in which case
/// the running drain picks the message up. Sending is therefore safe from inside
/// `update`, `view`, a renderer, a command, or another thread.
///
/// Clones are cheap and share the same element. Views receive a `&Sender` so
/// they can embed callbacks that send messages when invoked.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use oxide_elmish::{create_test_spawner, from_fns, Init, Runtime, Sender, TestRenderer, Update};
///
/// enum Msg { Increment }
///
/// struct View { count: i32, on_click: Arc<dyn Fn() + Send + Sync> }
///
/// let renderer = TestRenderer::new();
/// let send = Runtime::new(
///     from_fns(
///         |count: &i32, _msg: Msg| Update::model(count + 1),
///         |count: &i32, send: &Sender<Msg>| {
///             let send = send.clone();
///             View {
///                 count: *count,
///                 on_click: Arc::new(move || { send.send(Msg::Increment).ok(); }),
///             }
///         },
///     ),
///     renderer.clone(),
///     create_test_spawner(),
/// )
/// .use_element(Init::Model(0))
/// .unwrap();
///
/// // Callbacks are cloned out first: invoking one renders synchronously.
/// let on_click = renderer.with_renders(|renders| renders[0].on_click.clone());
/// on_click();
/// send.send(Msg::Increment).unwrap();
///
/// renderer.last(|view| assert_eq!(view.count, 2));
/// ```
pub struct Sender<Msg>(Arc<Box<dyn Dispatch<Msg>>>);

impl<Msg> Clone for Sender<Msg> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Msg: 'static> Sender<Msg> {
    pub(crate) fn new(dispatch: impl Dispatch<Msg> + 'static) -> Self {
        Self(Arc::new(Box::new(dispatch)))
    }

    /// Enqueue one message.
    ///
    /// A send made while no drain is running processes the message and renders
    /// before it returns, so consecutive sends render once each. Use
    /// [`send_all`](Self::send_all) to render a burst once.
    ///
    /// Errors raised by a drain that this call started are returned here. If
    /// `update`, `view` or the renderer panics, the panic unwinds through this
    /// call and messages queued behind the panicking one stay queued until the
    /// next send or [`flush`](Self::flush).
    pub fn send(&self, message: Msg) -> Result<(), ElmishError> {
        self.0.dispatch(message)
    }

    /// Drain anything still queued without sending a new message.
    ///
    /// After a panic interrupted a batch, this applies the remaining messages
    /// and renders the stored model, so the view matches the store again. It
    /// does nothing when the element is settled.
    pub fn flush(&self) -> Result<(), ElmishError> {
        self.0.dispatch_all(&mut core::iter::empty())
    }

    /// Enqueue a burst of messages and render once after all of them.
    ///
    /// The drain is held back while the messages are pushed, then each message is
    /// applied in order and a single render reflects the last model.
    pub fn send_all<I>(&self, messages: I) -> Result<(), ElmishError>
    where
        I: IntoIterator<Item = Msg>,
    {
        self.0.dispatch_all(&mut messages.into_iter())
    }
}

//! Deferred asynchronous work that produces a follow-up message.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(feature = "no_std")]
use alloc::string::{String, ToString};

use core::fmt::Display;
use core::future::Future;
use core::pin::Pin;

use thiserror::Error;

/// The future a [`Command`] resolves through.
pub(crate) type CommandFuture<Msg> = Pin<Box<dyn Future<Output = Result<Msg, CommandError>> + Send>>;

/// A deferred, asynchronous operation that produces exactly one message.
///
/// Commands are returned from [`ElementLogic::update`](crate::ElementLogic::update)
/// or an [`Init`](crate::Init) thunk next to the model they were computed from.
/// The runtime invokes the command when it is scheduled and hands the resulting
/// future to its [`Spawner`](crate::Spawner). Once the future resolves, its
/// message is pushed to the tail of the queue, so it is ordered by resolution
/// time rather than by scheduling time.
///
/// A command cannot be cancelled and the runtime imposes no timeout on it.
///
/// # Example
///
/// ```rust
/// use oxide_elmish::Command;
///
/// enum Msg {
///     Loaded(u32),
///     Tick,
/// }
///
/// // Available immediately
/// let tick = Command::just(Msg::Tick);
///
/// // Produced by async work
/// let load = Command::new(|| async { Msg::Loaded(42) });
///
/// // Fallible async work; the error is handled by the runtime's failure policy
/// let fetch = Command::try_new(|| async { "7".parse::<u32>().map(Msg::Loaded) });
/// ```
pub struct Command<Msg>(Box<dyn FnOnce() -> CommandFuture<Msg> + Send>);

impl<Msg: Send + 'static> Command<Msg> {
    /// Create a command from an async closure that always yields a message.
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Msg> + Send + 'static,
    {
        Self(Box::new(move || {
            let future = operation();
            Box::pin(async move { Ok(future.await) })
        }))
    }

    /// Create a command from an async closure that may fail.
    ///
    /// The error is turned into a [`CommandError`] and handled by the runtime's
    /// [`CommandFailurePolicy`].
    pub fn try_new<F, Fut, E>(operation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Msg, E>> + Send + 'static,
        E: Display + 'static,
    {
        Self(Box::new(move || {
            let future = operation();
            Box::pin(async move { future.await.map_err(CommandError::new) })
        }))
    }

    /// Create a command from a future that already exists.
    pub fn future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Msg> + Send + 'static,
    {
        Self::new(move || future)
    }

    /// Create a command that resolves to `message` as soon as it runs.
    pub fn just(message: Msg) -> Self {
        Self::new(move || async move { message })
    }

    /// Invoke the operation, yielding the future to spawn.
    pub(crate) fn run(self) -> CommandFuture<Msg> {
        (self.0)()
    }
}

/// Failure reported by a [`Command`] created with [`Command::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command failed: {reason}")]
pub struct CommandError {
    reason: String,
}

impl CommandError {
    pub fn new(reason: impl Display) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }

    /// The rendered failure reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// What the runtime does when a command fails.
///
/// The default is [`CommandFailurePolicy::Drop`]: the failure is logged and no
/// follow-up message is produced. Commands that need the loop to observe their
/// failures either resolve with their own error message or run under
/// [`CommandFailurePolicy::Report`].
#[derive(Default)]
pub enum CommandFailurePolicy<Msg> {
    /// Log the failure and produce no message.
    #[default]
    Drop,
    /// Convert the failure into a message that re-enters the queue.
    Report(Box<dyn Fn(CommandError) -> Msg + Send + Sync>),
}

impl<Msg> CommandFailurePolicy<Msg> {
    /// Report failures as messages built by `to_message`.
    pub fn report<F>(to_message: F) -> Self
    where
        F: Fn(CommandError) -> Msg + Send + Sync + 'static,
    {
        Self::Report(Box::new(to_message))
    }
}

//! Results of `init` and `update`.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;

use crate::Command;

/// The result of an update: a new model, optionally paired with a command.
///
/// The command is always evaluated against the model returned next to it.
pub enum Update<Model, Msg> {
    /// A new model and no side effect.
    Model(Model),
    /// A new model and a command to schedule.
    WithCommand(Model, Command<Msg>),
}

impl<Model, Msg> Update<Model, Msg> {
    pub fn model(model: Model) -> Self {
        Self::Model(model)
    }

    pub fn with_command(model: Model, command: Command<Msg>) -> Self {
        Self::WithCommand(model, command)
    }

    /// Normalize into `(model, command)`.
    pub fn into_parts(self) -> (Model, Option<Command<Msg>>) {
        match self {
            Self::Model(model) => (model, None),
            Self::WithCommand(model, command) => (model, Some(command)),
        }
    }
}

impl<Model, Msg> From<(Model, Command<Msg>)> for Update<Model, Msg> {
    fn from((model, command): (Model, Command<Msg>)) -> Self {
        Self::WithCommand(model, command)
    }
}

/// How an instance obtains its first model.
///
/// # Example
///
/// ```rust
/// use oxide_elmish::{Command, Init, Update};
///
/// #[derive(Clone)]
/// struct Model { count: i32 }
/// enum Msg { Increment }
///
/// let literal: Init<Model, Msg> = Init::Model(Model { count: 0 });
///
/// let bootstrapped: Init<Model, Msg> = Init::with(|| {
///     Update::with_command(Model { count: 0 }, Command::just(Msg::Increment))
/// });
/// ```
pub enum Init<Model, Msg> {
    /// A literal model; no command.
    Model(Model),
    /// A function evaluated once, on first use of the instance.
    Thunk(Box<dyn FnOnce() -> Update<Model, Msg>>),
}

impl<Model, Msg> Init<Model, Msg> {
    pub fn with<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Update<Model, Msg> + 'static,
    {
        Self::Thunk(Box::new(thunk))
    }

    pub(crate) fn resolve(self) -> (Model, Option<Command<Msg>>) {
        match self {
            Self::Model(model) => (model, None),
            Self::Thunk(thunk) => thunk().into_parts(),
        }
    }
}

//! Element logic: the update and view halves of the Elm contract.

use crate::{Sender, Update};

/// Application logic for one element.
///
/// Implementations provide two pure functions:
/// - [`update`](Self::update): `(Model, Message) -> Update<Model, Message>`
/// - [`view`](Self::view): derive a renderable `View` from the model
///
/// The initial model is supplied separately as an [`Init`](crate::Init) when the
/// element is started, see [`Runtime::use_element`](crate::Runtime::use_element).
///
/// # Example
///
/// ```rust
/// use oxide_elmish::{Command, ElementLogic, Sender, Update};
///
/// #[derive(Clone)]
/// struct Model { count: i32, loading: bool }
///
/// enum Msg { Increment, StartReset, EndReset }
///
/// struct Counter;
///
/// impl ElementLogic<Model, Msg, String> for Counter {
///     fn update(&self, model: &Model, message: Msg) -> Update<Model, Msg> {
///         match message {
///             Msg::Increment => Update::model(Model { count: model.count + 1, ..model.clone() }),
///             Msg::StartReset => Update::with_command(
///                 Model { loading: true, ..model.clone() },
///                 Command::just(Msg::EndReset),
///             ),
///             Msg::EndReset => Update::model(Model { count: 0, loading: false }),
///         }
///     }
///
///     fn view(&self, model: &Model, _send: &Sender<Msg>) -> String {
///         if model.loading {
///             "loading...".to_string()
///         } else {
///             format!("count is {}", model.count)
///         }
///     }
/// }
/// ```
pub trait ElementLogic<Model, Msg, View> {
    /// Compute the next model, and optionally a command, from the current model
    /// and a message.
    ///
    /// Must not have side effects beyond computing its result; deferred work
    /// belongs in the returned [`Command`](crate::Command). The model passed in is
    /// always the one produced by the previously applied message.
    fn update(&self, model: &Model, message: Msg) -> Update<Model, Msg>;

    /// Derive the view for a settled model.
    ///
    /// Called once per drained batch. The [`Sender`] lets the view embed
    /// callbacks that feed messages back into the element.
    fn view(&self, model: &Model, send: &Sender<Msg>) -> View;
}

/// [`ElementLogic`] built from a pair of closures. See [`from_fns`].
pub struct FnLogic<U, V> {
    update: U,
    view: V,
}

/// Build an [`ElementLogic`] from an update closure and a view closure.
pub fn from_fns<Model, Msg, View, U, V>(update: U, view: V) -> FnLogic<U, V>
where
    U: Fn(&Model, Msg) -> Update<Model, Msg>,
    V: Fn(&Model, &Sender<Msg>) -> View,
{
    FnLogic { update, view }
}

impl<Model, Msg, View, U, V> ElementLogic<Model, Msg, View> for FnLogic<U, V>
where
    U: Fn(&Model, Msg) -> Update<Model, Msg>,
    V: Fn(&Model, &Sender<Msg>) -> View,
{
    fn update(&self, model: &Model, message: Msg) -> Update<Model, Msg> {
        (self.update)(model, message)
    }

    fn view(&self, model: &Model, send: &Sender<Msg>) -> View {
        (self.view)(model, send)
    }
}

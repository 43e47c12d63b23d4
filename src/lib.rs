#![cfg_attr(feature = "no_std", no_std)]

//! A small Elm-architecture update loop for Rust with `no_std` support.
//!
//! An element is an initial model, a pure update function and a view function.
//! The runtime serializes incoming messages through a FIFO queue, applies each
//! one to evolve the model, and renders once per settled state. Asynchronous
//! follow-up work is expressed as [`Command`]s whose resulting messages re-enter
//! the same queue, so ordering is never lost and sending is always safe, even
//! from inside `update`, `view` or a renderer.
//!
//! ## Example
//!
//! ```rust
//! use std::future::Future;
//! use std::pin::Pin;
//!
//! use oxide_elmish::{Command, ElementLogic, Init, Renderer, Runtime, Sender, Update};
//!
//! #[derive(Clone)]
//! struct Model { count: i32, loading: bool }
//!
//! enum Msg { Increment, Decrement, StartReset, EndReset }
//!
//! struct Counter;
//!
//! impl ElementLogic<Model, Msg, String> for Counter {
//!     fn update(&self, model: &Model, message: Msg) -> Update<Model, Msg> {
//!         match message {
//!             Msg::Increment => Update::model(Model { count: model.count + 1, ..model.clone() }),
//!             Msg::Decrement => Update::model(Model { count: model.count - 1, ..model.clone() }),
//!             Msg::StartReset => Update::with_command(
//!                 Model { loading: true, ..model.clone() },
//!                 Command::new(|| async { Msg::EndReset }),
//!             ),
//!             Msg::EndReset => Update::model(Model { count: 0, loading: false }),
//!         }
//!     }
//!
//!     fn view(&self, model: &Model, _send: &Sender<Msg>) -> String {
//!         if model.loading {
//!             "loading...".to_string()
//!         } else {
//!             format!("count is {}", model.count)
//!         }
//!     }
//! }
//!
//! struct Console;
//! impl Renderer<String> for Console {
//!     fn render(&mut self, view: String) {
//!         println!("{view}");
//!     }
//! }
//!
//! // Create a spawner for your async runtime
//! let spawner = |_fut: Pin<Box<dyn Future<Output = ()> + Send>>| {
//!     // Spawn the future on your chosen runtime
//!     // e.g., tokio::spawn(fut); or async_std::task::spawn(fut);
//! };
//!
//! let send = Runtime::new(Counter, Console, spawner)
//!     .use_element(Init::Model(Model { count: 0, loading: false }))
//!     .unwrap();
//!
//! // Each send settles and renders; `send_all` renders once for the whole burst.
//! send.send(Msg::Increment).unwrap();
//! send.send_all([Msg::Increment, Msg::Decrement]).unwrap();
//! ```
//!
//! ## Keyed elements
//!
//! Several elements can share one [`Store`], each addressed by its own [`Key`]:
//!
//! ```rust
//! use oxide_elmish::{create_test_spawner, from_fns, Init, Key, Runtime, Store, Update};
//!
//! let store = Store::new();
//! let left = store.key();
//! let right = store.key();
//!
//! let start = |key: Key<i32>| {
//!     Runtime::new(
//!         from_fns(|count: &i32, step: i32| Update::model(count + step), |_: &i32, _| ()),
//!         |_view: ()| {},
//!         create_test_spawner(),
//!     )
//!     .with_store(store.bind(key))
//!     .use_element(Init::Model(0))
//!     .unwrap()
//! };
//!
//! start(left).send(5).unwrap();
//! start(right).send(-1).unwrap();
//!
//! assert_eq!(store.get(left), Ok(5));
//! assert_eq!(store.get(right), Ok(-1));
//! ```

#[cfg(feature = "no_std")]
extern crate alloc;

// Module declarations
mod command;
mod error;
mod logic;
mod queue;
mod renderer;
mod runtime;
mod sender;
mod state;
mod store;
mod update;

// Public re-exports
pub use command::{Command, CommandError, CommandFailurePolicy};
pub use error::ElmishError;
pub use logic::{from_fns, ElementLogic, FnLogic};
pub use queue::MessageQueue;
pub use renderer::Renderer;
pub use runtime::{Runtime, Spawner};
pub use sender::Sender;
pub use state::State;
pub use store::{Binding, Key, KeyId, ModelStore, Store};
pub use update::{Init, Update};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use renderer::TestRenderer;
#[cfg(any(test, feature = "testing"))]
pub use runtime::{create_test_spawner, test_spawner_fn, TestSpawner};

//! The runtime that drives an element's update cycle.

#[cfg(feature = "no_std")]
use alloc::boxed::Box;
#[cfg(all(any(test, feature = "testing"), feature = "no_std"))]
use alloc::collections::VecDeque;
#[cfg(all(any(test, feature = "testing"), feature = "no_std"))]
use alloc::vec::Vec;
#[cfg(all(any(test, feature = "testing"), not(feature = "no_std")))]
use std::collections::VecDeque;

use core::future::Future;
use core::marker::PhantomData;
use core::pin::Pin;

use portable_atomic_util::Arc;
use spin::Mutex;
use tracing::{debug, error, trace, warn};

use crate::command::CommandError;
use crate::sender::Dispatch;
use crate::{
    Command, CommandFailurePolicy, ElementLogic, ElmishError, Init, MessageQueue, ModelStore,
    Renderer, Sender, State,
};

/// A spawner trait for executing futures on an async runtime.
///
/// Commands are handed to the spawner as futures. This abstraction allows you
/// to use whatever concurrency model you want (tokio, async-std, a thread pool,
/// embassy, etc.).
///
/// Function pointers and closures automatically implement this trait via the
/// blanket implementation.
pub trait Spawner {
    /// Spawn a future on the async runtime.
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>);
}

impl<F> Spawner for F
where
    F: Fn(Pin<Box<dyn Future<Output = ()> + Send>>),
{
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
        self(future)
    }
}

/// Builder and entry point for one element instance.
///
/// [`use_element`](Self::use_element) starts the element:
/// 1. Resolves the [`Init`] into the first model and persists it, unless the
///    store already holds a model for this instance, in which case that model is
///    reused and `init` is skipped
/// 2. Schedules the initial [`Command`], if any
/// 3. Renders the initial view exactly once
///
/// From then on every message pushed through the returned [`Sender`] is applied
/// with [`ElementLogic::update`] and persisted to the store. Messages queued
/// while a drain is running (from `update`, `view`, a renderer, a resolved
/// command or another thread) are applied in the same drain, and the view is
/// rendered once the queue is empty, always from the latest model.
///
/// See the [crate-level documentation](crate) for a complete example.
///
/// # Type Parameters
///
/// * `Model` - The model/state type of the element
/// * `Msg` - The message type of the element
/// * `View` - The view type produced by [`ElementLogic::view`]
/// * `Logic` - The logic implementation type (implements [`ElementLogic`])
/// * `Render` - The renderer implementation type (implements [`Renderer`])
/// * `Spawn` - The spawner implementation type (implements [`Spawner`])
/// * `Storage` - Where the model lives (implements [`ModelStore`]); a private
///   [`State`] unless replaced with [`with_store`](Self::with_store)
pub struct Runtime<Model, Msg, View, Logic, Render, Spawn, Storage = State<Model>> {
    logic: Logic,
    renderer: Render,
    spawner: Spawn,
    store: Storage,
    failures: CommandFailurePolicy<Msg>,
    _types: PhantomData<fn() -> (Model, View)>,
}

impl<Model, Msg, View, Logic, Render, Spawn> Runtime<Model, Msg, View, Logic, Render, Spawn>
where
    Logic: ElementLogic<Model, Msg, View>,
    Render: Renderer<View>,
    Spawn: Spawner,
{
    /// Create a new runtime backed by its own [`State`].
    ///
    /// Nothing runs until [`use_element`](Self::use_element) is called.
    ///
    /// # Arguments
    ///
    /// * `logic` - Application logic implementing [`ElementLogic`]
    /// * `renderer` - Presentation layer receiving every settled view
    /// * `spawner` - Spawner to execute commands on your chosen runtime
    pub fn new(logic: Logic, renderer: Render, spawner: Spawn) -> Self {
        Runtime {
            logic,
            renderer,
            spawner,
            store: State::new(),
            failures: CommandFailurePolicy::Drop,
            _types: PhantomData,
        }
    }
}

impl<Model, Msg, View, Logic, Render, Spawn, Storage>
    Runtime<Model, Msg, View, Logic, Render, Spawn, Storage>
{
    /// Keep the model in `store` instead of a private [`State`].
    ///
    /// Pass a shared `State` or a [`Binding`](crate::Binding) from a keyed
    /// [`Store`](crate::Store). If the store already holds a model, the element
    /// resumes from it.
    pub fn with_store<Other>(self, store: Other) -> Runtime<Model, Msg, View, Logic, Render, Spawn, Other>
    where
        Other: ModelStore<Model>,
    {
        Runtime {
            logic: self.logic,
            renderer: self.renderer,
            spawner: self.spawner,
            store,
            failures: self.failures,
            _types: PhantomData,
        }
    }

    /// Choose what happens when a command fails.
    ///
    /// Defaults to [`CommandFailurePolicy::Drop`].
    pub fn with_command_failures(mut self, policy: CommandFailurePolicy<Msg>) -> Self {
        self.failures = policy;
        self
    }
}

impl<Model, Msg, View, Logic, Render, Spawn, Storage>
    Runtime<Model, Msg, View, Logic, Render, Spawn, Storage>
where
    Model: Clone + Send + 'static,
    Msg: Send + 'static,
    View: 'static,
    Logic: ElementLogic<Model, Msg, View> + Send + 'static,
    Render: Renderer<View> + Send + 'static,
    Spawn: Spawner + Send + Sync + 'static,
    Storage: ModelStore<Model> + Send + 'static,
{
    /// Start the element and return the sender that drives it.
    ///
    /// Renders the initial view before returning. Messages sent while the
    /// element was initializing (for example by a command that resolved right
    /// away) are drained before this returns.
    pub fn use_element(self, init: Init<Model, Msg>) -> Result<Sender<Msg>, ElmishError> {
        let shared = Arc::new(Shared {
            phase: Mutex::new(Phase::Uninitialized),
            queue: MessageQueue::new(),
            core: Mutex::new(Core {
                logic: self.logic,
                renderer: self.renderer,
                store: self.store,
                stale: false,
            }),
            spawner: self.spawner,
            failures: self.failures,
            _types: PhantomData,
        });

        let weak = Arc::downgrade(&shared);
        shared.queue.on_push(move || match weak.upgrade() {
            Some(shared) => Shared::drain(&shared),
            None => Ok(()),
        });

        Shared::initialize(&shared, init)?;
        *shared.phase.lock() = Phase::Idle;
        Shared::drain(&shared)?;

        Ok(Sender::new(shared))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Idle,
    Draining,
}

/// Holds the `Draining` phase; restores `Idle` when dropped, including on unwind.
struct DrainGuard<'a>(&'a Mutex<Phase>);

impl<'a> DrainGuard<'a> {
    fn acquire(phase: &'a Mutex<Phase>) -> Option<Self> {
        let mut current = phase.lock();
        if *current != Phase::Idle {
            return None;
        }
        *current = Phase::Draining;
        Some(Self(phase))
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = Phase::Idle;
    }
}

struct Core<Logic, Render, Storage> {
    logic: Logic,
    renderer: Render,
    store: Storage,
    /// Set while a batch runs and cleared once it rendered. Still set on entry
    /// when the previous batch unwound, so the stored model is rendered again.
    stale: bool,
}

/// State shared by every [`Sender`] of one element and by its in-flight commands.
///
/// `core` is only locked by whoever holds the drain phase (or by initialization,
/// before the phase first becomes `Idle`), so a re-entrant send never waits on it.
struct Shared<Model, Msg, View, Logic, Render, Spawn, Storage> {
    phase: Mutex<Phase>,
    queue: MessageQueue<Msg>,
    core: Mutex<Core<Logic, Render, Storage>>,
    spawner: Spawn,
    failures: CommandFailurePolicy<Msg>,
    _types: PhantomData<fn() -> (Model, View)>,
}

impl<Model, Msg, View, Logic, Render, Spawn, Storage>
    Shared<Model, Msg, View, Logic, Render, Spawn, Storage>
where
    Model: Clone + Send + 'static,
    Msg: Send + 'static,
    View: 'static,
    Logic: ElementLogic<Model, Msg, View> + Send + 'static,
    Render: Renderer<View> + Send + 'static,
    Spawn: Spawner + Send + Sync + 'static,
    Storage: ModelStore<Model> + Send + 'static,
{
    fn initialize(this: &Arc<Self>, init: Init<Model, Msg>) -> Result<(), ElmishError> {
        let mut guard = this.core.lock();
        let core = &mut *guard;

        let model = if core.store.exists() {
            debug!("element resumed from stored model");
            core.store.get().ok_or(ElmishError::UninitializedModel)?
        } else {
            let (model, command) = init.resolve();
            core.store.put(model.clone());
            debug!(command = command.is_some(), "element initialized");
            if let Some(command) = command {
                Self::schedule(this, command);
            }
            model
        };

        let view = core.logic.view(&model, &Sender::new(this.clone()));
        core.renderer.render(view);
        Ok(())
    }

    /// Drain the queue unless a drain is already running.
    fn drain(this: &Arc<Self>) -> Result<(), ElmishError> {
        loop {
            let Some(guard) = DrainGuard::acquire(&this.phase) else {
                return Ok(());
            };
            Self::drain_batch(this)?;
            drop(guard);

            // Messages sent by the view or renderer arrived after the last pop.
            if this.queue.size() == 0 {
                return Ok(());
            }
        }
    }

    fn drain_batch(this: &Arc<Self>) -> Result<(), ElmishError> {
        let mut guard = this.core.lock();
        let core = &mut *guard;

        if this.queue.size() == 0 && !core.stale {
            return Ok(());
        }
        if core.stale {
            warn!("previous batch was interrupted, re-rendering the stored model");
        }

        let mut model = core.store.get().ok_or(ElmishError::UninitializedModel)?;
        core.stale = true;
        let mut applied = 0usize;
        while let Some(message) = this.queue.pop() {
            let (next, command) = core.logic.update(&model, message).into_parts();
            core.store.put(next.clone());
            model = next;
            if let Some(command) = command {
                Self::schedule(this, command);
            }
            applied += 1;
            trace!(applied, pending = this.queue.size(), "message applied");
        }

        debug!(batch = applied, "rendering settled model");
        let view = core.logic.view(&model, &Sender::new(this.clone()));
        core.renderer.render(view);
        core.stale = false;
        Ok(())
    }

    fn schedule(this: &Arc<Self>, command: Command<Msg>) {
        trace!("scheduling command");
        let shared = this.clone();
        let future = command.run();
        this.spawner.spawn(Box::pin(async move {
            let outcome = future.await;
            if let Err(error) = shared.resolve(outcome) {
                error!(%error, "command result could not be applied");
            }
        }));
    }

    /// Feed a command's outcome back through the queue.
    fn resolve(&self, outcome: Result<Msg, CommandError>) -> Result<(), ElmishError> {
        match outcome {
            Ok(message) => self.queue.push(message),
            Err(error) => match &self.failures {
                CommandFailurePolicy::Drop => {
                    warn!(%error, "command failed, no message produced");
                    Ok(())
                }
                CommandFailurePolicy::Report(to_message) => self.queue.push(to_message(error)),
            },
        }
    }

    fn dispatch_all(
        this: &Arc<Self>,
        messages: &mut dyn Iterator<Item = Msg>,
    ) -> Result<(), ElmishError> {
        {
            // Held (when idle) so the pushes below only enqueue.
            let _held = DrainGuard::acquire(&this.phase);
            for message in messages {
                this.queue.push(message)?;
            }
        }
        Self::drain(this)
    }
}

impl<Model, Msg, View, Logic, Render, Spawn, Storage> Dispatch<Msg>
    for Arc<Shared<Model, Msg, View, Logic, Render, Spawn, Storage>>
where
    Model: Clone + Send + 'static,
    Msg: Send + 'static,
    View: 'static,
    Logic: ElementLogic<Model, Msg, View> + Send + 'static,
    Render: Renderer<View> + Send + 'static,
    Spawn: Spawner + Send + Sync + 'static,
    Storage: ModelStore<Model> + Send + 'static,
{
    fn dispatch(&self, message: Msg) -> Result<(), ElmishError> {
        self.queue.push(message)
    }

    fn dispatch_all(&self, messages: &mut dyn Iterator<Item = Msg>) -> Result<(), ElmishError> {
        Shared::dispatch_all(self, messages)
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test spawner function that executes futures synchronously.
///
/// This blocks on the future immediately rather than spawning it on an async runtime.
pub fn test_spawner_fn(fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
    futures::executor::block_on(fut);
}

#[cfg(any(test, feature = "testing"))]
/// Creates a test spawner that executes futures synchronously.
///
/// A command scheduled during a drain resolves before that drain renders, so
/// its message lands in the same batch. Use [`TestSpawner`] to observe the
/// state between scheduling and resolution.
///
/// Returns a function pointer that can be passed directly to runtime constructors
/// without heap allocation.
pub fn create_test_spawner() -> fn(Pin<Box<dyn Future<Output = ()> + Send>>) {
    test_spawner_fn
}

#[cfg(any(test, feature = "testing"))]
type PendingTask = Pin<Box<dyn Future<Output = ()> + Send>>;

#[cfg(any(test, feature = "testing"))]
/// Test spawner that parks command futures until the test runs them.
///
/// Only available with the `testing` feature or during tests.
///
/// Clones share the same pending list, so keep one clone and hand another to
/// the runtime. Running the pending futures stands in for "time passing":
///
/// ```rust
/// use oxide_elmish::{from_fns, Command, Init, Runtime, TestRenderer, TestSpawner, Update};
///
/// enum Msg { Start, Done }
///
/// let renderer = TestRenderer::new();
/// let spawner = TestSpawner::new();
///
/// let send = Runtime::new(
///     from_fns(
///         |_loading: &bool, message: Msg| match message {
///             Msg::Start => Update::with_command(true, Command::just(Msg::Done)),
///             Msg::Done => Update::model(false),
///         },
///         |loading: &bool, _| *loading,
///     ),
///     renderer.clone(),
///     spawner.clone(),
/// )
/// .use_element(Init::Model(false))
/// .unwrap();
///
/// send.send(Msg::Start).unwrap();
/// assert_eq!(spawner.pending(), 1);
/// renderer.last(|loading| assert!(*loading));
///
/// spawner.run_all();
/// renderer.last(|loading| assert!(!*loading));
/// ```
pub struct TestSpawner {
    tasks: Arc<Mutex<VecDeque<PendingTask>>>,
}

#[cfg(any(test, feature = "testing"))]
impl Clone for TestSpawner {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for TestSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Spawner for TestSpawner {
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
        self.tasks.lock().push_back(future);
    }
}

#[cfg(any(test, feature = "testing"))]
impl TestSpawner {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Number of futures spawned but not yet run.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run pending futures in spawn order until none are left, including the
    /// ones spawned while running.
    pub fn run_all(&self) {
        loop {
            // Released before running: the future may spawn more work.
            let next = self.tasks.lock().pop_front();
            match next {
                Some(task) => futures::executor::block_on(task),
                None => break,
            }
        }
    }

    /// Run the futures pending right now, newest first.
    ///
    /// Futures spawned while these run stay pending.
    pub fn run_all_reversed(&self) {
        let batch: Vec<PendingTask> = self.tasks.lock().drain(..).collect();
        for task in batch.into_iter().rev() {
            futures::executor::block_on(task);
        }
    }
}

//! Renderer abstraction for presenting views.

#[cfg(any(test, feature = "testing"))]
#[cfg(feature = "no_std")]
use alloc::vec::Vec;

#[cfg(any(test, feature = "testing"))]
use portable_atomic_util::Arc;
#[cfg(any(test, feature = "testing"))]
use spin::Mutex;

/// Renderer adapter that presents views.
///
/// Implement this trait to plug an element into a presentation layer (DOM
/// bindings, a terminal, a component tree, an embedded display, ...). Any
/// `FnMut(View)` closure is a renderer as well.
///
/// [`render`](Self::render) is called once for the initial model and then once
/// per drained batch of messages, always with the view of the latest model.
///
/// # Example
///
/// ```rust
/// use oxide_elmish::Renderer;
///
/// struct ConsoleRenderer;
///
/// impl Renderer<String> for ConsoleRenderer {
///     fn render(&mut self, view: String) {
///         println!("{view}");
///     }
/// }
/// ```
pub trait Renderer<View> {
    /// Present the given view.
    fn render(&mut self, view: View);
}

impl<View, F> Renderer<View> for F
where
    F: FnMut(View),
{
    fn render(&mut self, view: View) {
        self(view)
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test renderer that captures every rendered view for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same capture storage: hand one clone to the runtime and keep
/// another for assertions.
///
/// The capture storage is locked while [`with_renders`](Self::with_renders) and
/// [`last`](Self::last) run. Sending a message from inside them renders
/// synchronously and would wait on that lock forever, so clone view callbacks out
/// and invoke them afterwards.
///
/// # Example
///
/// ```rust
/// use oxide_elmish::{create_test_spawner, from_fns, Init, Runtime, TestRenderer, Update};
///
/// let renderer = TestRenderer::new();
///
/// let send = Runtime::new(
///     from_fns(|count: &u32, step: u32| Update::model(count + step), |count: &u32, _| *count),
///     renderer.clone(),
///     create_test_spawner(),
/// )
/// .use_element(Init::Model(0))
/// .unwrap();
///
/// send.send_all([1, 2, 3]).unwrap();
///
/// assert_eq!(renderer.count(), 2);
/// renderer.with_renders(|renders| assert_eq!(renders, &vec![0, 6]));
/// ```
pub struct TestRenderer<View> {
    renders: Arc<Mutex<Vec<View>>>,
}

#[cfg(any(test, feature = "testing"))]
impl<View> Clone for TestRenderer<View> {
    fn clone(&self) -> Self {
        Self {
            renders: self.renders.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl<View> Renderer<View> for TestRenderer<View> {
    fn render(&mut self, view: View) {
        self.renders.lock().push(view);
    }
}

#[cfg(any(test, feature = "testing"))]
impl<View> Default for TestRenderer<View> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<View> TestRenderer<View> {
    pub fn new() -> Self {
        Self {
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of renders that have occurred.
    pub fn count(&self) -> usize {
        self.renders.lock().len()
    }

    /// Access the captured views with a closure.
    pub fn with_renders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<View>) -> R,
    {
        let renders = self.renders.lock();
        f(&renders)
    }

    /// Access the most recent view.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been rendered yet.
    pub fn last<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&View) -> R,
    {
        let renders = self.renders.lock();
        match renders.last() {
            Some(view) => f(view),
            None => panic!("nothing has been rendered"),
        }
    }
}

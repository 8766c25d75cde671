//! Render scheduling
//!
//! [`Debounce`] collapses bursts of calls into a single trailing call. Each
//! call cancels the pending timer and arms a new one; only a timer that
//! survives the whole delay runs the wrapped function, with the arguments of
//! the last call. Timers are local tasks, so a `Debounce` must be driven
//! from inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// One frame at 60 Hz, rounded to whole milliseconds
pub const FRAME_INTERVAL: Duration = Duration::from_millis(17);

/// Trailing-edge debouncer; clones share the same timer
pub struct Debounce<A> {
    inner: Rc<DebounceInner<A>>,
}

struct DebounceInner<A> {
    delay: Duration,
    f: Rc<dyn Fn(A)>,
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl<A> Clone for Debounce<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> Debounce<A> {
    pub fn new<F>(delay: Duration, f: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            inner: Rc::new(DebounceInner {
                delay,
                f: Rc::new(f),
                pending: RefCell::new(None),
            }),
        }
    }

    /// Re-arm the timer with `args` as the arguments of the eventual call
    ///
    /// # Panics
    ///
    /// Panics if called outside a `LocalSet`.
    pub fn call(&self, args: A) {
        let superseded = self.cancel();
        trace!(superseded, "Scheduling debounced call");

        let delay = self.inner.delay;
        let f = Rc::clone(&self.inner.f);
        let inner = Rc::downgrade(&self.inner);

        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                inner.pending.borrow_mut().take();
            }
            f(args);
        });

        *self.inner.pending.borrow_mut() = Some(handle);
    }

    /// Cancel the pending call, returning whether one was pending
    pub fn cancel(&self) -> bool {
        match self.inner.pending.borrow_mut().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

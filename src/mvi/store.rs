//! Shared reducer store.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::intent::Intent;
use super::middleware::Middleware;
use super::reducer::Reducer;

/// Cloneable handle to a reducer-driven state container.
///
/// All clones share the same state. Each dispatch runs the reducer while
/// holding the channel's write lock, so subscribers observe transitions in
/// dispatch order.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Reducer> {
    tx: watch::Sender<R::State>,
    middleware: RwLock<Vec<Arc<dyn Middleware<R::State>>>>,
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(StoreInner {
                tx,
                middleware: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Builder form of [`Store::add_middleware`].
    pub fn with_middleware(self, middleware: impl Middleware<R::State> + 'static) -> Self {
        self.add_middleware(middleware);
        self
    }

    pub fn add_middleware(&self, middleware: impl Middleware<R::State> + 'static) {
        self.inner.middleware.write().push(Arc::new(middleware));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.inner.tx.borrow().clone()
    }

    /// Run an intent through the reducer and return the resulting state.
    pub fn dispatch(&self, intent: R::Intent) -> R::State {
        let label = intent.label();
        let mut transition = None;

        self.inner.tx.send_if_modified(|state| {
            let before = std::mem::take(state);
            let after = R::reduce(before.clone(), intent);
            let changed = before != after;
            *state = after.clone();
            transition = Some((before, after));
            changed
        });

        let Some((before, after)) = transition else {
            return self.state();
        };

        for middleware in self.inner.middleware.read().iter() {
            middleware.after(label, &before, &after);
        }
        after
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.inner.tx.subscribe()
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

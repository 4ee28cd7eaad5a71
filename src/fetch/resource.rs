//! Owner-facing fetch controller.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cancel::Liveness;
use crate::error::Result;
use crate::mvi::{LoggingMiddleware, Store};

use super::intent::FetchIntent;
use super::reducer::FetchReducer;
use super::state::{FetchData, FetchState};

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;
type Operation<T> = Arc<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// A single fetch lifecycle plus the operation that feeds it.
///
/// Cloning is cheap and every clone drives the same state.
pub struct Resource<T: FetchData> {
    name: &'static str,
    store: Store<FetchReducer<T>>,
    generation: Arc<AtomicU64>,
    owner: Liveness,
    last_operation: Arc<Mutex<Option<Operation<T>>>>,
}

impl<T: FetchData> Resource<T> {
    /// Create an idle resource. `name` only appears in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            store: Store::default().with_middleware(LoggingMiddleware::new(name)),
            generation: Arc::new(AtomicU64::new(0)),
            owner: Liveness::new(),
            last_operation: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.store.subscribe()
    }

    /// Run `operation` to completion and apply its outcome.
    ///
    /// Status flips to loading before the operation is polled. The returned
    /// snapshot reflects this call's outcome unless a newer trigger has
    /// superseded it in the meantime.
    pub async fn trigger<F, Fut>(&self, operation: F) -> FetchState<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(state) = self.released() {
            return state;
        }
        let operation = self.remember(operation);
        let generation = self.start();
        self.settle(generation, operation(), None).await
    }

    /// Like [`trigger`](Self::trigger) but runs on a background task.
    ///
    /// The returned [`FetchTask`] can discard the result before it lands.
    /// Once the owner is gone nothing runs and the task resolves to the
    /// current snapshot.
    pub fn spawn<F, Fut>(&self, operation: F) -> FetchTask<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(state) = self.released() {
            let live = Liveness::new();
            live.cancel();
            return FetchTask {
                generation: state.generation(),
                live,
                handle: tokio::spawn(async move { state }),
                store: self.store.clone(),
            };
        }
        let operation = self.remember(operation);
        self.spawn_operation(operation)
    }

    /// Re-run the last operation passed to `trigger` or `spawn`.
    ///
    /// Returns `None` if nothing has been triggered yet.
    pub async fn refetch(&self) -> Option<FetchState<T>> {
        let operation = self.last_operation.lock().clone()?;
        if let Some(state) = self.released() {
            return Some(state);
        }
        let generation = self.start();
        Some(self.settle(generation, operation(), None).await)
    }

    pub fn clear_error(&self) -> FetchState<T> {
        self.store.dispatch(FetchIntent::ClearError)
    }

    /// Return to idle and drop whatever is in flight.
    pub fn reset(&self) -> FetchState<T> {
        let generation = self.next_generation();
        self.store.dispatch(FetchIntent::Reset { generation })
    }

    /// The owner is gone: every pending result of this resource is discarded.
    pub fn drop_owner(&self) {
        tracing::debug!(resource = self.name, "Owner released, discarding pending results");
        self.owner.cancel();
    }

    pub fn is_owner_alive(&self) -> bool {
        !self.owner.is_cancelled()
    }

    /// Current snapshot if the owner is gone and no fetch may start.
    fn released(&self) -> Option<FetchState<T>> {
        if !self.owner.is_cancelled() {
            return None;
        }
        tracing::debug!(resource = self.name, "Owner released, fetch not started");
        Some(self.store.state())
    }

    fn remember<F, Fut>(&self, operation: F) -> Operation<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let operation: Operation<T> = Arc::new(move || Box::pin(operation()) as BoxFuture<T>);
        *self.last_operation.lock() = Some(Arc::clone(&operation));
        operation
    }

    fn spawn_operation(&self, operation: Operation<T>) -> FetchTask<T> {
        let generation = self.start();
        let live = Liveness::new();
        let this = self.clone();
        let task_live = live.clone();
        let handle = tokio::spawn(async move {
            this.settle(generation, operation(), Some(&task_live)).await
        });
        FetchTask {
            generation,
            live,
            handle,
            store: self.store.clone(),
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn start(&self) -> u64 {
        let generation = self.next_generation();
        tracing::debug!(resource = self.name, generation, "Fetch started");
        self.store.dispatch(FetchIntent::Started { generation });
        generation
    }

    async fn settle(
        &self,
        generation: u64,
        pending: BoxFuture<T>,
        live: Option<&Liveness>,
    ) -> FetchState<T> {
        let outcome = pending.await;

        if self.owner.is_cancelled() {
            tracing::debug!(resource = self.name, generation, "Owner gone, result discarded");
            return self.store.state();
        }
        if live.is_some_and(Liveness::is_cancelled) {
            tracing::debug!(resource = self.name, generation, "Fetch cancelled, result discarded");
            return self.store.dispatch(FetchIntent::Cancelled { generation });
        }

        match outcome {
            Ok(data) => {
                tracing::debug!(resource = self.name, generation, "Fetch succeeded");
                self.store
                    .dispatch(FetchIntent::Succeeded { generation, data })
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(resource = self.name, generation, error = %message, "Fetch failed");
                self.store.dispatch(FetchIntent::Failed {
                    generation,
                    message,
                })
            }
        }
    }
}

impl<T: FetchData> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            store: self.store.clone(),
            generation: Arc::clone(&self.generation),
            owner: self.owner.clone(),
            last_operation: Arc::clone(&self.last_operation),
        }
    }
}

/// Handle to a fetch running on a background task.
pub struct FetchTask<T: FetchData> {
    generation: u64,
    live: Liveness,
    handle: JoinHandle<FetchState<T>>,
    store: Store<FetchReducer<T>>,
}

impl<T: FetchData> FetchTask<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Discard this fetch's result when it arrives.
    ///
    /// The underlying request keeps running; only its outcome is dropped.
    pub fn cancel(&self) {
        self.live.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.live.is_cancelled()
    }

    /// Wait for the task and return the state it left behind.
    pub async fn join(self) -> FetchState<T> {
        match self.handle.await {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(generation = self.generation, error = %err, "Fetch task aborted");
                self.store.state()
            }
        }
    }
}

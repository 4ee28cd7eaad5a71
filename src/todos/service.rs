use tokio::sync::watch;

use crate::api::{ApiClient, Todo};
use crate::fetch::{FetchState, FetchStatus, Resource};
use crate::mvi::{LoggingMiddleware, Store};
use crate::storage::{keys, Storage, StorageError};

use super::list::{TodoIntent, TodoList, TodoReducer};

/// Remote todo fetching combined with the locally edited list.
///
/// A successful refresh replaces the local list and rewrites the
/// `todos-cache` entry; local edits rewrite the cache too.
#[derive(Clone)]
pub struct TodoService {
    api: ApiClient,
    storage: Storage,
    remote: Resource<Vec<Todo>>,
    list: Store<TodoReducer>,
}

impl TodoService {
    pub fn new(api: ApiClient, storage: Storage) -> Self {
        Self {
            api,
            storage,
            remote: Resource::new("todos"),
            list: Store::default().with_middleware(LoggingMiddleware::new("todo-list")),
        }
    }

    pub fn list(&self) -> TodoList {
        self.list.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.list.subscribe()
    }

    /// Fetch lifecycle of the last remote refresh.
    pub fn remote(&self) -> &Resource<Vec<Todo>> {
        &self.remote
    }

    /// Seed the local list from the cache. Returns whether anything was found.
    pub async fn load_cached(&self) -> bool {
        match self.storage.get_json::<Vec<Todo>>(keys::TODOS_CACHE).await {
            Some(items) => {
                tracing::debug!(count = items.len(), "Loaded cached todos");
                self.list.dispatch(TodoIntent::Replace(items));
                true
            }
            None => false,
        }
    }

    /// Fetch todos (optionally only those of `owner`) and adopt them locally.
    ///
    /// Only an unfiltered refresh rewrites the cache, so the cache always
    /// holds the full list.
    pub async fn refresh(&self, owner: Option<u64>) -> FetchState<Vec<Todo>> {
        let api = self.api.clone();
        let state = self
            .remote
            .trigger(move || {
                let api = api.clone();
                async move {
                    match owner {
                        Some(user_id) => api.todos_by_user(user_id).await,
                        None => api.todos().await,
                    }
                }
            })
            .await;

        if let Some(items) = state.data().filter(|_| state.status() == FetchStatus::Success) {
            self.list.dispatch(TodoIntent::Replace(items.clone()));
            if owner.is_some() {
                tracing::debug!(?owner, "Filtered refresh, todo cache left as is");
            } else if let Err(e) = self.save_cache().await {
                // The cache is a convenience; a failed write must not fail the fetch.
                tracing::warn!(error = %e, "Failed to write todo cache");
            }
        }
        state
    }

    pub async fn toggle(&self, id: u64) -> Result<TodoList, StorageError> {
        self.edit(TodoIntent::Toggle(id)).await
    }

    pub async fn add(&self, title: impl Into<String>, user_id: u64) -> Result<TodoList, StorageError> {
        self.edit(TodoIntent::Add {
            title: title.into(),
            user_id,
        })
        .await
    }

    pub async fn remove(&self, id: u64) -> Result<TodoList, StorageError> {
        self.edit(TodoIntent::Remove(id)).await
    }

    async fn edit(&self, intent: TodoIntent) -> Result<TodoList, StorageError> {
        let list = self.list.dispatch(intent);
        self.save_cache().await?;
        Ok(list)
    }

    async fn save_cache(&self) -> Result<(), StorageError> {
        let list = self.list.state();
        self.storage.set_json(keys::TODOS_CACHE, list.items()).await
    }
}

//! Shared test utilities and fixtures.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use starter_core::api::{ApiClient, Todo, User};
use starter_core::config::ApiConfig;
use starter_core::storage::{MemoryStore, Storage};

pub use mock_api::{CapturedRequest, MockApi, MockResponse};

/// Client pointed at `base_url` over the given storage.
pub fn client(base_url: &str, storage: Storage) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        connect_timeout_seconds: 2,
        request_timeout_seconds: Some(5),
    };
    ApiClient::new(&config, storage).expect("client should build")
}

/// Storage plus the engine behind it, for tests that poke the engine directly.
pub fn memory_storage() -> (Storage, MemoryStore) {
    let engine = MemoryStore::new();
    (Storage::new(engine.clone()), engine)
}

pub fn todo(id: u64, completed: bool) -> Todo {
    Todo {
        id,
        user_id: 1,
        title: format!("todo {}", id),
        completed,
    }
}

pub fn todos_json(count: u64) -> String {
    let items: Vec<Todo> = (1..=count).map(|id| todo(id, id % 2 == 0)).collect();
    serde_json::to_string(&items).unwrap()
}

pub fn user() -> User {
    User {
        id: 1,
        name: "Leanne Graham".to_string(),
        username: "Bret".to_string(),
        email: "Sincere@april.biz".to_string(),
        phone: None,
        website: Some("hildegard.org".to_string()),
    }
}

pub fn login_json(token: &str) -> String {
    serde_json::json!({ "token": token, "user": user() }).to_string()
}

mod common;

use std::sync::Arc;

use common::{client, login_json, user, MockApi, MockResponse};
use starter_core::api::Credentials;
use starter_core::session::{AuthStatus, SessionManager};
use starter_core::storage::{keys, FileStore, Storage};
use starter_core::Error;
use tempfile::TempDir;

fn manager_at(mock: &MockApi, path: &std::path::Path) -> (SessionManager, Storage) {
    let storage = Storage::new(FileStore::new(path));
    let api = client(&mock.base_url(), storage.clone());
    (SessionManager::new(storage.clone(), Arc::new(api)), storage)
}

#[tokio::test]
async fn session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::json(&login_json("abc"))).await;

    let (first, _) = manager_at(&mock, &path);
    first
        .login(&Credentials::new("bret", "secret"))
        .await
        .unwrap();
    drop(first);

    // A fresh manager over a fresh store at the same path stands in for a
    // new process.
    let (second, _) = manager_at(&mock, &path);
    assert_eq!(second.state().status(), AuthStatus::Unauthenticated);
    let state = second.restore().await;

    assert_eq!(state.status(), AuthStatus::Authenticated);
    assert_eq!(state.token().map(|t| t.expose()), Some("abc"));
    assert_eq!(state.user(), Some(&user()));
    assert_eq!(mock.requests().await.len(), 1, "restore must not hit the network");
}

#[tokio::test]
async fn restored_token_is_sent_with_requests() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::json(&login_json("abc"))).await;

    let (manager, storage) = manager_at(&mock, &path);
    manager
        .login(&Credentials::new("bret", "secret"))
        .await
        .unwrap();

    let api = client(&mock.base_url(), storage);
    api.todos().await.unwrap();

    let requests = mock.requests().await;
    assert!(requests[0].header("authorization").is_none());
    assert_eq!(requests[1].header("authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn logout_clears_persisted_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::json(&login_json("abc"))).await;
    mock.enqueue(MockResponse::status(204, "")).await;

    let (manager, storage) = manager_at(&mock, &path);
    manager
        .login(&Credentials::new("bret", "secret"))
        .await
        .unwrap();
    let state = manager.logout().await;

    assert_eq!(state.status(), AuthStatus::Unauthenticated);
    assert!(state.session().is_none());
    assert!(storage.get_string(keys::AUTH_TOKEN).await.is_none());
    assert!(storage.get_string(keys::USER_DATA).await.is_none());

    let requests = mock.requests().await;
    assert_eq!(requests[1].path, "/auth/logout");
    assert_eq!(requests[1].header("authorization"), Some("Bearer abc"));

    let (fresh, _) = manager_at(&mock, &path);
    assert_eq!(fresh.restore().await.status(), AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn logout_clears_locally_when_server_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::json(&login_json("abc"))).await;
    mock.enqueue(MockResponse::status(500, r#"{"message": "boom"}"#))
        .await;

    let (manager, storage) = manager_at(&mock, &path);
    manager
        .login(&Credentials::new("bret", "secret"))
        .await
        .unwrap();
    let state = manager.logout().await;

    assert_eq!(state.status(), AuthStatus::Unauthenticated);
    assert!(state.error().is_none());
    assert!(storage.get_string(keys::AUTH_TOKEN).await.is_none());
}

#[tokio::test]
async fn rejected_login_keeps_store_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::status(
        401,
        r#"{"message": "Invalid credentials"}"#,
    ))
    .await;

    let (manager, storage) = manager_at(&mock, &path);
    let err = manager
        .login(&Credentials::new("bret", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "[401] Invalid credentials");
    let state = manager.state();
    assert_eq!(state.status(), AuthStatus::Unauthenticated);
    assert_eq!(state.error(), Some("[401] Invalid credentials"));
    assert!(storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_credentials_never_reach_server() {
    let dir = TempDir::new().unwrap();
    let mock = MockApi::start().await;
    let (manager, _) = manager_at(&mock, &dir.path().join("storage.json"));

    let err = manager
        .login(&Credentials::new("", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn response_without_token_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mock = MockApi::start().await;
    mock.enqueue(MockResponse::json(&login_json(""))).await;

    let (manager, storage) = manager_at(&mock, &path);
    let err = manager
        .login(&Credentials::new("bret", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert!(!manager.state().is_authenticated());
    assert!(storage.get_string(keys::AUTH_TOKEN).await.is_none());
}

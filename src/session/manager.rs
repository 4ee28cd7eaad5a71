use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{Authenticator, Credentials, SessionToken, User};
use crate::error::{ApiError, Error, Result};
use crate::mvi::{LoggingMiddleware, Store};
use crate::storage::{keys, Storage, StorageError};

use super::intent::SessionIntent;
use super::reducer::SessionReducer;
use super::state::{Session, SessionState};

/// Owns the session state and keeps it in sync with durable storage.
///
/// Intended as a process-wide singleton; clones share one state.
#[derive(Clone)]
pub struct SessionManager {
    store: Store<SessionReducer>,
    storage: Storage,
    authenticator: Arc<dyn Authenticator>,
}

impl SessionManager {
    pub fn new(storage: Storage, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            store: Store::default().with_middleware(LoggingMiddleware::new("session")),
            storage,
            authenticator,
        }
    }

    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    pub fn current_token(&self) -> Option<SessionToken> {
        self.store.state().token().cloned()
    }

    pub fn clear_error(&self) -> SessionState {
        self.store.dispatch(SessionIntent::ClearError)
    }

    /// Rebuild the session from durable storage. Never touches the network.
    ///
    /// A token without an identity (or the reverse) is treated as no
    /// session and the leftover is removed. Read failures count as absent.
    pub async fn restore(&self) -> SessionState {
        self.store.dispatch(SessionIntent::RestoreStarted);

        let token = self
            .storage
            .get_json::<SessionToken>(keys::AUTH_TOKEN)
            .await
            .filter(|t| !t.is_empty());
        let user = self.storage.get_json::<User>(keys::USER_DATA).await;

        let restored = match (token, user) {
            (Some(token), Some(user)) => Some(Session { token, user }),
            (None, None) => None,
            (token, _) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    "Persisted session is incomplete, discarding"
                );
                self.forget().await;
                None
            }
        };

        match &restored {
            Some(session) => {
                tracing::info!(user = %session.user.username, "Session restored")
            }
            None => tracing::debug!("No persisted session"),
        }
        self.store.dispatch(SessionIntent::Restored(restored))
    }

    /// Authenticate, persist the session, then publish it.
    ///
    /// Every failure is recorded in the state's error field and also
    /// returned. Blank credentials fail without a remote call.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        if let Err(err) = credentials.validate() {
            return Err(self.fail(err));
        }

        self.store.dispatch(SessionIntent::LoginStarted);

        let response = match self.authenticator.authenticate(credentials).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err)),
        };
        if response.token.is_empty() {
            return Err(self.fail(Error::Api(ApiError::new(
                "Authentication response did not include a token",
            ))));
        }

        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(err) = self.persist(&session).await {
            // Don't leave half a session on disk.
            self.forget().await;
            return Err(self.fail(err.into()));
        }

        tracing::info!(user = %session.user.username, "Logged in");
        self.store
            .dispatch(SessionIntent::LoginSucceeded(session.clone()));
        Ok(session)
    }

    /// End the session. Always succeeds locally.
    ///
    /// The remote invalidation is best-effort: its failure is logged and
    /// the local session is cleared regardless.
    pub async fn logout(&self) -> SessionState {
        let token = match self.current_token() {
            Some(token) => Some(token),
            None => self.storage.get_json(keys::AUTH_TOKEN).await,
        };

        if let Some(token) = token {
            if let Err(err) = self.authenticator.invalidate(&token).await {
                tracing::warn!(error = %err.user_message(), "Remote logout failed, clearing local session anyway");
            }
        }

        self.forget().await;
        tracing::info!("Logged out");
        self.store.dispatch(SessionIntent::LoggedOut)
    }

    async fn persist(&self, session: &Session) -> std::result::Result<(), StorageError> {
        self.storage.set_json(keys::AUTH_TOKEN, &session.token).await?;
        self.storage.set_json(keys::USER_DATA, &session.user).await
    }

    async fn forget(&self) {
        for key in [keys::AUTH_TOKEN, keys::USER_DATA] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!(key, error = %e, "Failed to remove persisted session value");
            }
        }
    }

    fn fail(&self, err: Error) -> Error {
        let message = err.user_message();
        tracing::warn!(error = %message, "Login failed");
        self.store.dispatch(SessionIntent::LoginFailed(message));
        err
    }
}

use crate::api::{SessionToken, User};
use crate::mvi::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// No session. Also the state before restoration has run.
    #[default]
    Unauthenticated,
    /// Reading a persisted session at startup.
    Restoring,
    /// A login request is in flight.
    Authenticating,
    Authenticated,
}

/// Token and identity of the signed-in user. One never exists without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub(crate) status: AuthStatus,
    pub(crate) session: Option<Session>,
    pub(crate) error: Option<String>,
}

impl State for SessionState {}

impl SessionState {
    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.session.as_ref().map(|s| &s.token)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// A restore or login is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.status,
            AuthStatus::Restoring | AuthStatus::Authenticating
        )
    }
}

//! Session tokens and authentication headers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{AuthResponse, Credentials};
use crate::error::Result;

/// Bearer token that never shows up in logs.
///
/// The inner value is hidden from `Debug` and `Display`; use
/// [`expose`](Self::expose) when the raw value is actually needed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(••••••••)")
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Header name and value for authentication.
pub type AuthHeader = (String, String);

/// `Authorization: Bearer <token>`, or `None` for a blank token.
pub fn bearer_header(token: &SessionToken) -> Option<AuthHeader> {
    if token.is_empty() {
        return None;
    }
    Some((
        "Authorization".to_string(),
        format!("Bearer {}", token.expose()),
    ))
}

/// Remote half of the session lifecycle.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a token and identity.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// Tell the remote the token is no longer in use.
    async fn invalidate(&self, token: &SessionToken) -> Result<()>;
}

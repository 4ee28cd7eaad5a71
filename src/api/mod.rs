//! Remote resource API.
//!
//! A thin HTTP+JSON client over the todo/user test backend plus the
//! authentication endpoints used by the session lifecycle.

mod auth;
mod client;
mod types;

pub use auth::{bearer_header, AuthHeader, Authenticator, SessionToken};
pub use client::ApiClient;
pub use types::{AuthResponse, Credentials, Todo, User};

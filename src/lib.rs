//! Data layer of an app starter template.
//!
//! - [`api`]: HTTP+JSON client for the todo/user backend and authentication
//! - [`storage`]: asynchronous key-value persistence with a fail-open read policy
//! - [`fetch`]: the idle/loading/success/failure lifecycle around one retrieval
//! - [`session`]: login, logout and startup restoration of a persisted session
//! - [`todos`]: fetched todos plus local optimistic edits
//!
//! All state lives in [`mvi::Store`]s driven by pure reducers.

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod mvi;
pub mod session;
pub mod settings;
pub mod storage;
pub mod todos;

pub use error::{ApiError, Error, Result, UNKNOWN_ERROR_MESSAGE};

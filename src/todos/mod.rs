//! Todo items: remote list plus local optimistic edits.
//!
//! Edits (toggle, add, remove) only change the local list and its cache;
//! they are never sent back to the remote backend.

mod list;
mod service;

pub use list::{TodoIntent, TodoList, TodoReducer};
pub use service::TodoService;

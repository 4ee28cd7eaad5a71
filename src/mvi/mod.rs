//! Unidirectional state containers.
//!
//! Every lifecycle in this crate (fetch, session, local todo edits) is a
//! pure reducer driven through a [`Store`].
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ subscribers
//!    ↑                      │
//!    └──── Middleware ◄─────┘
//! ```
//!
//! - **State**: snapshot owned by the store, cloned out to readers
//! - **Intent**: a transition request (trigger, result, user edit)
//! - **Reducer**: pure `(State, Intent) -> State`
//! - **Middleware**: observes each dispatch after the reducer ran

mod intent;
mod middleware;
mod reducer;
mod state;
mod store;

pub use intent::Intent;
pub use middleware::{LoggingMiddleware, Middleware};
pub use reducer::Reducer;
pub use state::State;
pub use store::Store;

//! Resource fetch lifecycle.
//!
//! One asynchronous retrieval wrapped in an idle/loading/success/failure
//! state machine. Presentation code reads `data`, `status` and `error` from
//! the snapshot and calls [`Resource::trigger`] or [`Resource::refetch`].
//!
//! Policy decisions:
//! - the latest trigger wins; an older in-flight result is dropped on arrival
//! - a failed refetch keeps the previous data next to the error
//! - cancelled or orphaned results are never applied

mod intent;
mod reducer;
mod resource;
mod state;

pub use intent::FetchIntent;
pub use reducer::FetchReducer;
pub use resource::{FetchTask, Resource};
pub use state::{FetchData, FetchState, FetchStatus};

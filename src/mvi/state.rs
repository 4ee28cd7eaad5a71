//! Marker trait for store state.

/// Snapshot type held by a [`Store`](super::Store).
///
/// `PartialEq` lets middleware and subscribers skip no-op transitions,
/// `Default` is the state a fresh store starts from.
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {}

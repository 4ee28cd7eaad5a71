use crate::mvi::State;

/// Bound for values a [`Resource`](super::Resource) can hold.
pub trait FetchData: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {}

impl<T> FetchData for T where T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// Snapshot of one fetch lifecycle.
///
/// `error` is only ever set while `status` is `Failure` (it may be cleared
/// without leaving `Failure`). `data` holds the last successful value and
/// survives later loading and failure states.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub(crate) status: FetchStatus,
    pub(crate) data: Option<T>,
    pub(crate) error: Option<String>,
    pub(crate) generation: u64,
    /// Status the current load interrupted; a cancelled load returns to it.
    pub(crate) resume: FetchStatus,
}

impl<T: FetchData> State for FetchState<T> {}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            generation: 0,
            resume: FetchStatus::Idle,
        }
    }
}

impl<T> FetchState<T> {
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    /// Data from an earlier success shown while loading or after a failure.
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.status != FetchStatus::Success
    }

    /// Trigger counter of the most recent fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_default() {
        let state = FetchState::<u32>::default();
        assert_eq!(state.status(), FetchStatus::Idle);
        assert!(state.data().is_none());
        assert!(state.error().is_none());
        assert!(!state.is_loading());
        assert!(!state.is_stale());
    }

    #[test]
    fn stale_only_outside_success() {
        let mut state = FetchState {
            status: FetchStatus::Success,
            data: Some(1u32),
            error: None,
            generation: 1,
            ..FetchState::default()
        };
        assert!(!state.is_stale());
        state.status = FetchStatus::Failure;
        assert!(state.is_stale());
    }
}

use std::marker::PhantomData;

use crate::mvi::Reducer;

use super::intent::FetchIntent;
use super::state::{FetchData, FetchState, FetchStatus};

/// Pure transition function for [`FetchState`].
pub struct FetchReducer<T>(PhantomData<fn() -> T>);

impl<T: FetchData> Reducer for FetchReducer<T> {
    type State = FetchState<T>;
    type Intent = FetchIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FetchIntent::Started { generation } => {
                if generation <= state.generation {
                    return state;
                }
                // A superseding trigger keeps what the first one interrupted.
                let resume = match state.status {
                    FetchStatus::Loading => state.resume,
                    settled => settled,
                };
                FetchState {
                    status: FetchStatus::Loading,
                    error: None,
                    generation,
                    resume,
                    ..state
                }
            }

            FetchIntent::Succeeded { generation, data } => {
                if !is_pending(&state, generation) {
                    return state;
                }
                FetchState {
                    status: FetchStatus::Success,
                    data: Some(data),
                    error: None,
                    ..state
                }
            }

            FetchIntent::Failed {
                generation,
                message,
            } => {
                if !is_pending(&state, generation) {
                    return state;
                }
                // Previous data stays visible next to the error.
                FetchState {
                    status: FetchStatus::Failure,
                    error: Some(message),
                    ..state
                }
            }

            FetchIntent::Cancelled { generation } => {
                if !is_pending(&state, generation) {
                    return state;
                }
                // Back to the interrupted status. A failure stays a failure
                // but its message was already dismissed by the trigger.
                FetchState {
                    status: state.resume,
                    error: None,
                    ..state
                }
            }

            FetchIntent::ClearError => FetchState {
                error: None,
                ..state
            },

            FetchIntent::Reset { generation } => FetchState {
                generation: generation.max(state.generation),
                ..FetchState::default()
            },
        }
    }
}

fn is_pending<T>(state: &FetchState<T>, generation: u64) -> bool {
    state.status == FetchStatus::Loading && state.generation == generation
}

//! Reducer trait.

use super::intent::Intent;
use super::state::State;

/// Transforms state based on intents.
///
/// The reducer is the only place where transitions happen and must not
/// perform I/O: `(State, Intent) -> State`.
pub trait Reducer: Send + Sync + 'static {
    type State: State;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

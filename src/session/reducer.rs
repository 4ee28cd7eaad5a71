use crate::mvi::Reducer;

use super::intent::SessionIntent;
use super::state::{AuthStatus, SessionState};

pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = SessionState;
    type Intent = SessionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SessionIntent::RestoreStarted => SessionState {
                status: AuthStatus::Restoring,
                ..state
            },

            SessionIntent::Restored(restored) => match (state.status, restored) {
                // A login that finished or is running while restoring takes precedence.
                (AuthStatus::Authenticated, _) | (AuthStatus::Authenticating, None) => state,
                (_, Some(session)) => SessionState {
                    status: AuthStatus::Authenticated,
                    session: Some(session),
                    error: None,
                },
                (_, None) => SessionState {
                    status: AuthStatus::Unauthenticated,
                    session: None,
                    ..state
                },
            },

            SessionIntent::LoginStarted => SessionState {
                status: AuthStatus::Authenticating,
                error: None,
                ..state
            },

            SessionIntent::LoginSucceeded(session) => SessionState {
                status: AuthStatus::Authenticated,
                session: Some(session),
                error: None,
            },

            SessionIntent::LoginFailed(message) => {
                // Only the error changes; an existing session stays as it was.
                let status = if state.session.is_some() {
                    AuthStatus::Authenticated
                } else {
                    AuthStatus::Unauthenticated
                };
                SessionState {
                    status,
                    error: Some(message),
                    ..state
                }
            }

            SessionIntent::LoggedOut => SessionState::default(),

            SessionIntent::ClearError => SessionState {
                error: None,
                ..state
            },
        }
    }
}

use crate::mvi::Intent;

use super::state::Session;

#[derive(Debug, Clone)]
pub enum SessionIntent {
    RestoreStarted,
    /// Restoration finished; `None` means nothing usable was persisted.
    Restored(Option<Session>),
    LoginStarted,
    LoginSucceeded(Session),
    /// Login was rejected locally or remotely.
    LoginFailed(String),
    LoggedOut,
    ClearError,
}

impl Intent for SessionIntent {
    fn label(&self) -> &'static str {
        match self {
            Self::RestoreStarted => "session/restore_started",
            Self::Restored(_) => "session/restored",
            Self::LoginStarted => "session/login_started",
            Self::LoginSucceeded(_) => "session/login_succeeded",
            Self::LoginFailed(_) => "session/login_failed",
            Self::LoggedOut => "session/logged_out",
            Self::ClearError => "session/clear_error",
        }
    }
}

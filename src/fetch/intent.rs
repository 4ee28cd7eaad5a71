use crate::mvi::Intent;

use super::state::FetchData;

#[derive(Debug, Clone)]
pub enum FetchIntent<T> {
    /// A trigger fired. Generations only move forward.
    Started { generation: u64 },
    /// The operation for `generation` resolved.
    Succeeded { generation: u64, data: T },
    /// The operation for `generation` failed with a rendered message.
    Failed { generation: u64, message: String },
    /// The caller gave up on `generation` before it resolved.
    Cancelled { generation: u64 },
    /// Dismiss the error without touching status or data.
    ClearError,
    /// Back to a fresh idle state; anything in flight is superseded.
    Reset { generation: u64 },
}

impl<T: FetchData> Intent for FetchIntent<T> {
    fn label(&self) -> &'static str {
        match self {
            Self::Started { .. } => "fetch/started",
            Self::Succeeded { .. } => "fetch/succeeded",
            Self::Failed { .. } => "fetch/failed",
            Self::Cancelled { .. } => "fetch/cancelled",
            Self::ClearError => "fetch/clear_error",
            Self::Reset { .. } => "fetch/reset",
        }
    }
}

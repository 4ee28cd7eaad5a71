//! Dispatch observers.

use super::state::State;

/// Observes every dispatch after the reducer ran.
///
/// Middleware sees the intent label plus the states on both sides of the
/// transition. It cannot alter the result.
pub trait Middleware<S: State>: Send + Sync {
    fn after(&self, intent: &'static str, before: &S, after: &S);
}

/// Logs each dispatch at debug level under the given store name.
pub struct LoggingMiddleware {
    store: &'static str,
}

impl LoggingMiddleware {
    pub fn new(store: &'static str) -> Self {
        Self { store }
    }
}

impl<S: State + std::fmt::Debug> Middleware<S> for LoggingMiddleware {
    fn after(&self, intent: &'static str, before: &S, after: &S) {
        if before == after {
            tracing::trace!(store = self.store, intent, "Dispatch left state unchanged");
        } else {
            tracing::debug!(store = self.store, intent, state = ?after, "State transition");
        }
    }
}

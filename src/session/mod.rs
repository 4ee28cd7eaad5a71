//! Credential session lifecycle.
//!
//! ```text
//! Unauthenticated ──restore──→ Restoring ──→ Authenticated | Unauthenticated
//! Unauthenticated ──login───→ Authenticating ──→ Authenticated | Unauthenticated (+error)
//! Authenticated ──logout──→ Unauthenticated
//! ```
//!
//! The session is mirrored to durable storage under `auth-token` and
//! `user-data` so it survives process restarts.

mod intent;
mod manager;
mod reducer;
mod state;

pub use intent::SessionIntent;
pub use manager::SessionManager;
pub use reducer::SessionReducer;
pub use state::{AuthStatus, Session, SessionState};

//! Marker trait for intents.

/// A request for a state transition.
///
/// Intents come from two places:
/// - callers (trigger a fetch, log in, toggle an item)
/// - completed asynchronous work (a response arrived, a read finished)
pub trait Intent: Send + 'static {
    /// Short name used by middleware when logging a dispatch.
    fn label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

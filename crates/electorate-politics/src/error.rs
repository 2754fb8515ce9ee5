//! Error types for the electorate-politics crate.

/// Errors raised by the politics registries.
#[derive(Debug, thiserror::Error)]
pub enum PoliticsError {
    /// The named policy is not registered.
    #[error("unknown policy: {name}")]
    UnknownPolicy {
        /// The name that was looked up.
        name: String,
    },
}

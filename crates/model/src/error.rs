use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ErrorKind {
    /// The prompt was rejected by the service's content policy.
    Moderated,
    /// The generation service is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}

use serde::{Deserialize, Serialize};

/// A completely received reply from the generation provider.
///
/// Providers resolve transport- and decode-level problems into their own
/// error type; a `GenerationReply` always carries renderable text, even
/// when the service had nothing to say (implementations substitute a
/// fixed fallback string in that case).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationReply {
    /// The reply text.
    pub text: String,
}

impl GenerationReply {
    /// Creates a reply with the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

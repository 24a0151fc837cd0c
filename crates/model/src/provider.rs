use std::error::Error;

use crate::error::ErrorKind;
use crate::reply::GenerationReply;
use crate::request::GenerationRequest;

/// The error type for a generation provider.
pub trait GenerationProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a generation provider, which is an entry for
/// completing a single prompt.
///
/// Once the provider is created, it should behave like a stateless
/// object. It can still have internal state, but callers should not rely
/// on it, and the provider should be prepared for being dropped anytime.
pub trait GenerationProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: GenerationProviderError;

    /// Completes a single prompt.
    ///
    /// The returned future must be independent of `self` so that the
    /// caller can run it after the provider handle has been moved.
    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationReply, Self::Error>>
    + Send
    + 'static;
}

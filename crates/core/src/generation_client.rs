use std::pin::Pin;
use std::sync::Arc;

use banter_model::{
    GenerationProvider, GenerationProviderError, GenerationReply,
    GenerationRequest,
};
use tracing::Instrument;

pub(crate) type GenerateResult =
    Result<GenerationReply, Box<dyn GenerationProviderError>>;
type BoxedGenerateFuture =
    Pin<Box<dyn Future<Output = GenerateResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(GenerationRequest) -> BoxedGenerateFuture + Send + Sync
>;

/// A wrapper around a generation provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub(crate) struct GenerationClient {
    handler_fn: HandlerFn,
}

impl GenerationClient {
    #[inline]
    pub fn new<P: GenerationProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `GenerationClient`
        // doesn't have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.generate(&req);
            Box::pin(
                async move {
                    trace!("sent a request: {:?}", req);
                    match fut.await {
                        Ok(reply) => Ok(reply),
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err)
                                as Box<dyn GenerationProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("generation req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the settled reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe: the underlying request is simply
    /// dropped when this operation is cancelled.
    #[inline]
    pub async fn send_request(&self, req: GenerationRequest) -> GenerateResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use banter_test_model::{PresetReply, TestGenerationProvider};

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestGenerationProvider::default();
        provider.add_reply("Hi", PresetReply::text("How are you?"));

        let client = GenerationClient::new(provider);

        for _ in 0..3 {
            let reply = client
                .send_request(GenerationRequest::new("Hi"))
                .await
                .unwrap();
            assert_eq!(reply.text, "How are you?");
        }
    }

    #[tokio::test]
    async fn test_error_handling() {
        let provider = TestGenerationProvider::default();
        let client = GenerationClient::new(provider);
        let reply_or_err = client
            .send_request(GenerationRequest::new("Hi"))
            .await;
        assert!(matches!(reply_or_err, Err(_)));
    }
}

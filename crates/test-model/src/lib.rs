//! A local fake generation provider for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use banter_model::{
    ErrorKind, GenerationProvider, GenerationProviderError, GenerationReply,
    GenerationRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl GenerationProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake generation provider.
///
/// Before sending requests, set up the reply script: each prompt is
/// looked up verbatim and resolves to its preset outcome. A prompt with
/// no scripted reply fails, which keeps tests honest about what they
/// actually send.
///
/// # Note
///
/// This type is not optimized for production use. You should only use
/// it for testing.
#[derive(Clone, Default)]
pub struct TestGenerationProvider {
    script: HashMap<String, PresetReply>,
    delay: Option<Duration>,
}

impl TestGenerationProvider {
    /// Scripts the reply for a prompt.
    #[inline]
    pub fn add_reply<S: Into<String>>(
        &mut self,
        prompt: S,
        preset: PresetReply,
    ) {
        self.script.insert(prompt.into(), preset);
    }

    /// Sets the artificial delay before a request settles.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }
}

impl GenerationProvider for TestGenerationProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationReply, Self::Error>>
    + Send
    + 'static {
        let preset = self.script.get(&req.prompt).cloned();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            let Some(preset) = preset else {
                return Err(Error {
                    message: "prompt is not scripted",
                    kind: ErrorKind::Other,
                });
            };
            match preset.outcome {
                PresetOutcome::Text(text) => Ok(GenerationReply::new(text)),
                PresetOutcome::Failure(kind) => Err(Error {
                    message: "scripted failure",
                    kind,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_reply() {
        let mut provider = TestGenerationProvider::default();
        provider.add_reply("Hi", PresetReply::text("How are you?"));

        for _ in 0..3 {
            let reply = provider
                .generate(&GenerationRequest::new("Hi"))
                .await
                .unwrap();
            assert_eq!(reply.text, "How are you?");
        }
    }

    #[tokio::test]
    async fn test_unscripted_prompt_fails() {
        let provider = TestGenerationProvider::default();
        let err = provider
            .generate(&GenerationRequest::new("Hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mut provider = TestGenerationProvider::default();
        provider
            .add_reply("Hi", PresetReply::failure(ErrorKind::Moderated));
        let err = provider
            .generate(&GenerationRequest::new("Hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Moderated);
    }
}

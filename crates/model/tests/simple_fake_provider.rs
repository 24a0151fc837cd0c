use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use banter_model::{
    ErrorKind, GenerationProvider, GenerationProviderError, GenerationReply,
    GenerationRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeProviderError(ErrorKind);

impl Display for FakeProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeProviderError {}

impl GenerationProviderError for FakeProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

struct FakeProvider;

impl GenerationProvider for FakeProvider {
    type Error = FakeProviderError;

    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationReply, Self::Error>>
    + Send
    + 'static {
        let prompt = req.prompt.clone();
        async move {
            if prompt.is_empty() {
                return Err(FakeProviderError(ErrorKind::Other));
            }
            sleep(Duration::from_millis(1)).await;
            Ok(GenerationReply::new(format!("You said {prompt}")))
        }
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeProvider;
        let req = GenerationRequest::new("Good morning");
        let reply = provider.generate(&req).await.unwrap();
        assert_eq!(reply.text, "You said Good morning");
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeProvider;
        let req = GenerationRequest::new("");
        let err = provider.generate(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}

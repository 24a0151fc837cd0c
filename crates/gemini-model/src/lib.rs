//! A generation provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use banter_model::{
    ErrorKind, GenerationProvider, GenerationProviderError, GenerationReply,
    GenerationRequest,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use proto::NO_RESPONSE_FALLBACK;
use proto::GenerateContentResponse;

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl GenerationProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini generation provider.
///
/// The API key travels as a query parameter of the request URL, which is
/// how the service authenticates key-based callers. The key itself is
/// never part of this crate; it arrives through [`GeminiConfig`] at
/// startup.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl GenerationProvider for GeminiProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationReply, Self::Error>>
    + Send
    + 'static {
        let body = proto::create_request(req);
        let resp_fut = self
            .client
            .post(format!(
                "{}/models/{}:generateContent?key={}",
                self.config.base_url, self.config.model, self.config.api_key
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Other));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let kind = if status == StatusCode::TOO_MANY_REQUESTS {
                    ErrorKind::RateLimitExceeded
                } else {
                    ErrorKind::Other
                };
                return Err(Error::new(
                    format!("request failed with status {status}"),
                    kind,
                ));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let resp: GenerateContentResponse = match resp.json().await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(
                        format!("malformed response: {err}"),
                        ErrorKind::Other,
                    ));
                }
            };

            if let Some(reason) = resp
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref())
            {
                return Err(Error::new(
                    format!("prompt was blocked: {reason}"),
                    ErrorKind::Moderated,
                ));
            }

            let text = proto::reply_text(resp);
            trace!("received a reply ({} bytes)", text.len());
            Ok(GenerationReply::new(text))
        }
    }
}

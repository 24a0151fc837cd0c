use std::fmt::Debug;

/// Builder for [`GeminiConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GeminiConfigBuilder {
    api_key: String,
    model: Option<String>,
    base_url: Option<String>,
}

impl GeminiConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            base_url: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL, e.g. for a server-side proxy that holds
    /// the real credential.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key,
            model: self
                .model
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            base_url: self.base_url.unwrap_or_else(|| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
        }
    }
}

impl Debug for GeminiConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for the Gemini provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) base_url: String,
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeminiConfigBuilder::with_api_key("super-secret")
            .with_model("custom")
            .build();
        let formatted = format!("{config:?}");
        assert!(!formatted.contains("super-secret"));
        assert!(formatted.contains("<redacted>"));
    }
}

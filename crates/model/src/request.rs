/// A request to be sent to the generation provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenerationRequest {
    /// The user prompt to complete.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a request for the given prompt.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// The kind of recognition failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecognizeErrorKind {
    /// No speech was detected before the capability gave up.
    NoSpeech,
    /// The audio input could not be captured.
    AudioCapture,
    /// Any other errors.
    Other,
}

/// The error type for a speech recognizer.
#[derive(Debug)]
pub struct RecognizeError {
    message: String,
    kind: RecognizeErrorKind,
}

impl RecognizeError {
    /// Creates an error with the given kind and message.
    #[inline]
    pub fn new<S: Into<String>>(kind: RecognizeErrorKind, message: S) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> RecognizeErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RecognizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RecognizeError {}

/// A one-shot speech recognizer.
///
/// One capture session produces one final transcript: interim results
/// are not reported and only a single alternative is returned.
pub trait SpeechRecognizer: Send + Sync {
    /// Captures speech once and resolves with the final transcript.
    ///
    /// The future must be independent of `self`.
    fn recognize(
        &self,
    ) -> impl Future<Output = Result<String, RecognizeError>> + Send + 'static;
}

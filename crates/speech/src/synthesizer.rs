use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::voice::Voice;

/// The locale used for all speech interaction.
pub const SPEECH_LANG: &str = "en-US";

/// The neutral speaking rate.
pub const NEUTRAL_RATE: f32 = 1.0;

/// The neutral speaking pitch.
pub const NEUTRAL_PITCH: f32 = 1.0;

/// A piece of text to be spoken.
///
/// Delivery parameters are fixed at neutral values; only the voice
/// varies, and only by explicit choice of the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    /// The text to speak.
    pub text: String,
    /// The voice to speak with, or `None` for the engine default.
    pub voice: Option<Voice>,
    /// Language tag for the utterance.
    pub lang: String,
    /// Speaking rate.
    pub rate: f32,
    /// Speaking pitch.
    pub pitch: f32,
}

impl Utterance {
    /// Creates an utterance with the fixed locale and neutral delivery.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            voice: None,
            lang: SPEECH_LANG.to_owned(),
            rate: NEUTRAL_RATE,
            pitch: NEUTRAL_PITCH,
        }
    }

    /// Sets the voice to speak with.
    #[inline]
    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self
    }
}

/// The error type for a speech synthesizer.
#[derive(Debug)]
pub struct SynthesisError {
    message: String,
}

impl SynthesisError {
    /// Creates an error with the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SynthesisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for SynthesisError {}

/// A speech synthesizer.
///
/// The synthesizer is a single playback resource: starting a new
/// utterance implicitly cancels whatever was playing before it.
pub trait SpeechSynthesizer: Send + Sync {
    /// Lists the voices the engine offers.
    fn voices(&self) -> Vec<Voice>;

    /// Starts playback of the utterance.
    ///
    /// The future resolves when playback stops, whether it ran to the
    /// end or was cancelled, and must be independent of `self` so that
    /// the caller can await it elsewhere.
    fn speak(
        &self,
        utterance: Utterance,
    ) -> impl Future<Output = Result<(), SynthesisError>> + Send + 'static;

    /// Stops any in-progress playback.
    fn cancel(&self);
}

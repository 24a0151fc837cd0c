use std::pin::Pin;
use std::sync::Arc;

use banter_speech::{
    RecognizeError, SpeechRecognizer, SpeechSynthesizer, SynthesisError,
    Utterance, Voice,
};

type BoxedSpeakFuture =
    Pin<Box<dyn Future<Output = Result<(), SynthesisError>> + Send>>;
type BoxedRecognizeFuture =
    Pin<Box<dyn Future<Output = Result<String, RecognizeError>> + Send>>;

trait SynthesizerObject: Send + Sync {
    fn voices(&self) -> Vec<Voice>;

    fn speak(&self, utterance: Utterance) -> BoxedSpeakFuture;

    fn cancel(&self);
}

struct AnySynthesizer<S: SpeechSynthesizer>(S);

impl<S: SpeechSynthesizer> SynthesizerObject for AnySynthesizer<S> {
    #[inline]
    fn voices(&self) -> Vec<Voice> {
        self.0.voices()
    }

    #[inline]
    fn speak(&self, utterance: Utterance) -> BoxedSpeakFuture {
        Box::pin(self.0.speak(utterance))
    }

    #[inline]
    fn cancel(&self) {
        self.0.cancel()
    }
}

/// The controller's owned handle to the single playback resource.
///
/// Every start and cancel goes through this handle; nothing else in the
/// process talks to the synthesizer.
#[derive(Clone)]
pub(crate) struct SynthesizerClient {
    inner: Arc<dyn SynthesizerObject>,
}

impl SynthesizerClient {
    #[inline]
    pub fn new<S: SpeechSynthesizer + 'static>(synthesizer: S) -> Self {
        Self {
            inner: Arc::new(AnySynthesizer(synthesizer)),
        }
    }

    #[inline]
    pub fn voices(&self) -> Vec<Voice> {
        self.inner.voices()
    }

    #[inline]
    pub fn speak(&self, utterance: Utterance) -> BoxedSpeakFuture {
        self.inner.speak(utterance)
    }

    #[inline]
    pub fn cancel(&self) {
        self.inner.cancel()
    }
}

trait RecognizerObject: Send + Sync {
    fn recognize(&self) -> BoxedRecognizeFuture;
}

struct AnyRecognizer<R: SpeechRecognizer>(R);

impl<R: SpeechRecognizer> RecognizerObject for AnyRecognizer<R> {
    #[inline]
    fn recognize(&self) -> BoxedRecognizeFuture {
        Box::pin(self.0.recognize())
    }
}

/// A type-erased handle to the speech recognition capability.
#[derive(Clone)]
pub(crate) struct RecognizerClient {
    inner: Arc<dyn RecognizerObject>,
}

impl RecognizerClient {
    #[inline]
    pub fn new<R: SpeechRecognizer + 'static>(recognizer: R) -> Self {
        Self {
            inner: Arc::new(AnyRecognizer(recognizer)),
        }
    }

    #[inline]
    pub fn recognize(&self) -> BoxedRecognizeFuture {
        self.inner.recognize()
    }
}

use banter_model::GenerationProvider;
use banter_speech::{SpeechRecognizer, SpeechSynthesizer};

use super::Controller;
use crate::export::ExportSink;
use crate::generation_client::GenerationClient;
use crate::speech_client::{RecognizerClient, SynthesizerClient};
use crate::transcript::{Exchange, ExchangeId};

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) generation_client: GenerationClient,
    pub(crate) recognizer: Option<RecognizerClient>,
    pub(crate) synthesizer: Option<SynthesizerClient>,
    pub(crate) export_sink: Option<Box<dyn ExportSink>>,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    pub(crate) on_exchange: Option<Box<dyn Fn(&Exchange) + Send + Sync>>,
    pub(crate) on_speaking:
        Option<Box<dyn Fn(Option<ExchangeId>) + Send + Sync>>,
    pub(crate) on_listening: Option<Box<dyn Fn(bool) + Send + Sync>>,
    pub(crate) on_alert: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified generation provider.
    #[inline]
    pub fn with_generation_provider<P: GenerationProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            generation_client: GenerationClient::new(provider),
            recognizer: None,
            synthesizer: None,
            export_sink: None,
            on_idle: None,
            on_exchange: None,
            on_speaking: None,
            on_listening: None,
            on_alert: None,
        }
    }

    /// Attaches the speech recognition capability.
    ///
    /// Without one, voice capture raises the alert callback instead.
    #[inline]
    pub fn with_recognizer<R: SpeechRecognizer + 'static>(
        mut self,
        recognizer: R,
    ) -> Self {
        self.recognizer = Some(RecognizerClient::new(recognizer));
        self
    }

    /// Attaches the speech synthesis capability.
    ///
    /// The controller becomes the sole owner of the playback resource.
    #[inline]
    pub fn with_synthesizer<S: SpeechSynthesizer + 'static>(
        mut self,
        synthesizer: S,
    ) -> Self {
        self.synthesizer = Some(SynthesizerClient::new(synthesizer));
        self
    }

    /// Attaches the sink that receives exported transcripts.
    #[inline]
    pub fn with_export_sink<E: ExportSink>(mut self, sink: E) -> Self {
        self.export_sink = Some(Box::new(sink));
        self
    }

    /// Attaches a callback to be invoked whenever a request settles and
    /// the controller returns to idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Attaches a callback to be invoked when an exchange's reply
    /// settles.
    #[inline]
    pub fn on_exchange(
        mut self,
        on_exchange: impl Fn(&Exchange) + Send + Sync + 'static,
    ) -> Self {
        self.on_exchange = Some(Box::new(on_exchange));
        self
    }

    /// Attaches a callback to be invoked when the speaking exchange
    /// changes.
    #[inline]
    pub fn on_speaking(
        mut self,
        on_speaking: impl Fn(Option<ExchangeId>) + Send + Sync + 'static,
    ) -> Self {
        self.on_speaking = Some(Box::new(on_speaking));
        self
    }

    /// Attaches a callback to be invoked when the listening flag
    /// changes.
    #[inline]
    pub fn on_listening(
        mut self,
        on_listening: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_listening = Some(Box::new(on_listening));
        self
    }

    /// Attaches a callback for blocking user-facing alerts.
    #[inline]
    pub fn on_alert(
        mut self,
        on_alert: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_alert = Some(Box::new(on_alert));
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> Controller {
        Controller::spawn_from_builder(self)
    }
}

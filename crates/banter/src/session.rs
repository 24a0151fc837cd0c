use banter_core::transcript::{Exchange, ExchangeId};
use banter_core::{Controller, ControllerBuilder, Snapshot};
use banter_model::GenerationProvider;
use banter_speech::{SpeechRecognizer, SpeechSynthesizer};

use crate::export::FileExportSink;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified generation provider.
    pub fn with_generation_provider<P: GenerationProvider + 'static>(
        provider: P,
    ) -> Self {
        let controller_builder =
            ControllerBuilder::with_generation_provider(provider);
        Self { controller_builder }
    }

    /// Attaches the speech recognition capability.
    #[inline]
    pub fn with_recognizer<R: SpeechRecognizer + 'static>(
        mut self,
        recognizer: R,
    ) -> Self {
        self.controller_builder =
            self.controller_builder.with_recognizer(recognizer);
        self
    }

    /// Attaches the speech synthesis capability.
    #[inline]
    pub fn with_synthesizer<S: SpeechSynthesizer + 'static>(
        mut self,
        synthesizer: S,
    ) -> Self {
        self.controller_builder =
            self.controller_builder.with_synthesizer(synthesizer);
        self
    }

    /// Attaches a callback to be invoked when a request settles and the
    /// session becomes idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_idle(on_idle);
        self
    }

    /// Attaches a callback to be invoked when an exchange's reply
    /// settles.
    #[inline]
    pub fn on_exchange(
        mut self,
        on_exchange: impl Fn(&Exchange) + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder =
            self.controller_builder.on_exchange(on_exchange);
        self
    }

    /// Attaches a callback to be invoked when the speaking exchange
    /// changes.
    #[inline]
    pub fn on_speaking(
        mut self,
        on_speaking: impl Fn(Option<ExchangeId>) + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder =
            self.controller_builder.on_speaking(on_speaking);
        self
    }

    /// Attaches a callback to be invoked when the listening flag
    /// changes.
    #[inline]
    pub fn on_listening(
        mut self,
        on_listening: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder =
            self.controller_builder.on_listening(on_listening);
        self
    }

    /// Attaches a callback for blocking user-facing alerts.
    #[inline]
    pub fn on_alert(
        mut self,
        on_alert: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_alert(on_alert);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let controller = self
            .controller_builder
            .with_export_sink(FileExportSink::default())
            .build();

        Session { controller }
    }
}

/// A chat session, like a window that displays messages and has an
/// input box.
///
/// The session holds a fully configured controller that you can use
/// directly, and it is basically a wrapper around [`Controller`].
pub struct Session {
    controller: Controller,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn send_message(&self, message: &str) {
        self.controller.submit(message);
    }

    /// Arms edit mode for an exchange.
    #[inline]
    pub fn begin_edit(&self, id: ExchangeId) {
        self.controller.begin_edit(id);
    }

    /// Empties the transcript and stops playback.
    #[inline]
    pub fn clear(&self) {
        self.controller.clear();
    }

    /// Saves the transcript next to the binary.
    #[inline]
    pub fn export_transcript(&self) {
        self.controller.export_transcript();
    }

    /// Starts a one-shot voice capture.
    #[inline]
    pub fn voice_capture(&self) {
        self.controller.voice_capture();
    }

    /// Starts or stops speaking an exchange's reply.
    #[inline]
    pub fn toggle_speech(&self, id: ExchangeId) {
        self.controller.toggle_speech(id);
    }

    /// Returns a read-only copy of the current state.
    #[inline]
    pub async fn snapshot(&self) -> Snapshot {
        self.controller.snapshot().await
    }
}

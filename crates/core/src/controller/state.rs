use std::fmt::{self, Debug};

use banter_model::GenerationRequest;
use banter_speech::{RecognizeError, Utterance, preferred_voice};
use tokio::sync::{mpsc, oneshot};

use super::builder::ControllerBuilder;
use super::Snapshot;
use crate::export::{EXPORT_FILE_NAME, ExportSink};
use crate::extract;
use crate::generation_client::{GenerateResult, GenerationClient};
use crate::speech_client::{RecognizerClient, SynthesizerClient};
use crate::transcript::{Exchange, ExchangeId, Message, Transcript};

pub(crate) enum Event {
    Submit {
        text: String,
    },
    GenerationSettled {
        id: ExchangeId,
        generation: u64,
        result: GenerateResult,
    },
    BeginEdit {
        id: ExchangeId,
    },
    Clear,
    Export,
    VoiceCapture,
    RecognitionSettled {
        result: Result<String, RecognizeError>,
    },
    ToggleSpeech {
        id: ExchangeId,
    },
    SpeechEnded {
        id: ExchangeId,
    },
    Query(oneshot::Sender<Snapshot>),
}

impl Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Submit { text } => {
                f.debug_struct("Submit").field("text", text).finish()
            }
            Event::GenerationSettled { id, generation, .. } => f
                .debug_struct("GenerationSettled")
                .field("id", id)
                .field("generation", generation)
                .finish_non_exhaustive(),
            Event::BeginEdit { id } => {
                f.debug_struct("BeginEdit").field("id", id).finish()
            }
            Event::Clear => f.write_str("Clear"),
            Event::Export => f.write_str("Export"),
            Event::VoiceCapture => f.write_str("VoiceCapture"),
            Event::RecognitionSettled { result } => f
                .debug_struct("RecognitionSettled")
                .field("result", result)
                .finish(),
            Event::ToggleSpeech { id } => {
                f.debug_struct("ToggleSpeech").field("id", id).finish()
            }
            Event::SpeechEnded { id } => {
                f.debug_struct("SpeechEnded").field("id", id).finish()
            }
            Event::Query(_) => f.write_str("Query"),
        }
    }
}

pub(crate) struct ControllerState {
    generation_client: GenerationClient,
    recognizer: Option<RecognizerClient>,
    synthesizer: Option<SynthesizerClient>,
    export_sink: Option<Box<dyn ExportSink>>,

    transcript: Transcript,
    input: String,
    loading: bool,
    listening: bool,
    speaking: Option<ExchangeId>,
    editing: Option<ExchangeId>,
    // Bumped by `clear`; a settled request carrying an older value is
    // talking about a transcript that no longer exists.
    generation: u64,

    event_tx: mpsc::UnboundedSender<Event>,

    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    on_exchange: Option<Box<dyn Fn(&Exchange) + Send + Sync>>,
    on_speaking: Option<Box<dyn Fn(Option<ExchangeId>) + Send + Sync>>,
    on_listening: Option<Box<dyn Fn(bool) + Send + Sync>>,
    on_alert: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl ControllerState {
    pub fn from_builder(
        builder: ControllerBuilder,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let ControllerBuilder {
            generation_client,
            recognizer,
            synthesizer,
            export_sink,
            on_idle,
            on_exchange,
            on_speaking,
            on_listening,
            on_alert,
        } = builder;

        Self {
            generation_client,
            recognizer,
            synthesizer,
            export_sink,
            transcript: Default::default(),
            input: Default::default(),
            loading: false,
            listening: false,
            speaking: None,
            editing: None,
            generation: 0,
            event_tx,
            on_idle,
            on_exchange,
            on_speaking,
            on_listening,
            on_alert,
        }
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Submit { text } => self.submit(text),
            Event::GenerationSettled {
                id,
                generation,
                result,
            } => self.generation_settled(id, generation, result),
            Event::BeginEdit { id } => self.begin_edit(id),
            Event::Clear => self.clear(),
            Event::Export => self.export(),
            Event::VoiceCapture => self.voice_capture(),
            Event::RecognitionSettled { result } => {
                self.recognition_settled(result)
            }
            Event::ToggleSpeech { id } => self.toggle_speech(id),
            Event::SpeechEnded { id } => self.speech_ended(id),
            Event::Query(reply) => {
                reply.send(self.snapshot()).ok();
            }
        }
    }

    fn submit(&mut self, text: String) {
        let text = text.trim().to_owned();
        if text.is_empty() {
            return;
        }
        if self.loading {
            // The input control is disabled while a request is in
            // flight, so this only happens to callers that bypass it.
            debug!("a request is already in flight, dropping the input");
            return;
        }

        self.input.clear();
        self.loading = true;

        let id = match self.editing.take() {
            Some(id) => {
                let exchange = self
                    .transcript
                    .get_mut(id)
                    .expect("edit target must exist");
                exchange.user.text = text.clone();
                id
            }
            None => self.transcript.append_user(text.clone()),
        };

        let generation = self.generation;
        let client = self.generation_client.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result =
                client.send_request(GenerationRequest::new(text)).await;
            event_tx
                .send(Event::GenerationSettled {
                    id,
                    generation,
                    result,
                })
                .ok();
        });
    }

    fn generation_settled(
        &mut self,
        id: ExchangeId,
        generation: u64,
        result: GenerateResult,
    ) {
        // Settled always returns to idle, on both outcomes.
        self.loading = false;

        if generation != self.generation {
            debug!("the transcript has changed, discarding the reply");
            self.notify_idle();
            return;
        }

        let parsed = match result {
            Ok(reply) => extract::parse_reply(&reply.text),
            Err(err) => {
                error!("generation failed: {err:?}");
                extract::failure_reply()
            }
        };
        if let Some(exchange) = self.transcript.get_mut(id) {
            exchange.reply = Some(Message::model(parsed));
        }
        if let (Some(on_exchange), Some(exchange)) =
            (&self.on_exchange, self.transcript.get(id))
        {
            on_exchange(exchange);
        }
        self.notify_idle();
    }

    fn begin_edit(&mut self, id: ExchangeId) {
        let exchange = self
            .transcript
            .get(id)
            .expect("edit target must exist");
        self.input = exchange.user.text.clone();
        self.editing = Some(id);
    }

    fn clear(&mut self) {
        self.transcript.clear();
        self.editing = None;
        self.input.clear();
        self.generation += 1;
        self.stop_speaking();
    }

    fn export(&self) {
        let Some(sink) = &self.export_sink else {
            warn!("no export sink is configured");
            return;
        };
        let contents = self.transcript.export_text();
        if let Err(err) = sink.save(EXPORT_FILE_NAME, contents.as_bytes()) {
            error!("failed to export the transcript: {err}");
        }
    }

    fn voice_capture(&mut self) {
        if self.listening {
            debug!("a recognition session is already active");
            return;
        }
        if self.loading {
            debug!("a request is in flight, ignoring voice capture");
            return;
        }
        let Some(recognizer) = self.recognizer.clone() else {
            if let Some(on_alert) = &self.on_alert {
                on_alert("Speech recognition is not available.");
            }
            return;
        };

        self.listening = true;
        self.notify_listening();

        let fut = recognizer.recognize();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = fut.await;
            event_tx.send(Event::RecognitionSettled { result }).ok();
        });
    }

    fn recognition_settled(
        &mut self,
        result: Result<String, RecognizeError>,
    ) {
        self.listening = false;
        self.notify_listening();
        match result {
            Ok(transcript) => self.submit(transcript),
            Err(err) => {
                error!("speech recognition error: {err}");
            }
        }
    }

    fn toggle_speech(&mut self, id: ExchangeId) {
        let Some(synthesizer) = self.synthesizer.clone() else {
            debug!("no synthesizer is configured");
            return;
        };

        if self.speaking == Some(id) {
            self.stop_speaking();
            return;
        }

        let Some(text) = self
            .transcript
            .get(id)
            .and_then(|exchange| exchange.reply.as_ref())
            .map(|reply| reply.text.clone())
        else {
            debug!("exchange has no reply to speak");
            return;
        };

        // Replace whatever was playing before.
        synthesizer.cancel();

        let voices = synthesizer.voices();
        let mut utterance = Utterance::new(text);
        if let Some(voice) = preferred_voice(&voices) {
            utterance = utterance.with_voice(voice.clone());
        }

        let fut = synthesizer.speak(utterance);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = fut.await {
                error!("speech synthesis error: {err}");
            }
            event_tx.send(Event::SpeechEnded { id }).ok();
        });

        self.speaking = Some(id);
        self.notify_speaking();
    }

    fn speech_ended(&mut self, id: ExchangeId) {
        // End signals from playback that has already been replaced or
        // cancelled are stale.
        if self.speaking == Some(id) {
            self.speaking = None;
            self.notify_speaking();
        }
    }

    fn stop_speaking(&mut self) {
        if let Some(synthesizer) = &self.synthesizer {
            synthesizer.cancel();
        }
        if self.speaking.take().is_some() {
            self.notify_speaking();
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            exchanges: self.transcript.exchanges().to_vec(),
            loading: self.loading,
            listening: self.listening,
            speaking: self.speaking,
            editing: self.editing,
            input: self.input.clone(),
        }
    }

    #[inline]
    fn notify_idle(&self) {
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    #[inline]
    fn notify_speaking(&self) {
        if let Some(on_speaking) = &self.on_speaking {
            on_speaking(self.speaking);
        }
    }

    #[inline]
    fn notify_listening(&self) {
        if let Some(on_listening) = &self.on_listening {
            on_listening(self.listening);
        }
    }
}

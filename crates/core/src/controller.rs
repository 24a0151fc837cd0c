//! The transcript controller.

mod builder;
mod state;
#[cfg(test)]
mod tests;

use tokio::select;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use crate::transcript::{Exchange, ExchangeId};
pub use builder::ControllerBuilder;
use state::{ControllerState, Event};

/// A read-only copy of the controller's observable state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// The exchanges in display order.
    pub exchanges: Vec<Exchange>,
    /// Whether a generation request is in flight.
    pub loading: bool,
    /// Whether a recognition session is active.
    pub listening: bool,
    /// The exchange whose reply is being spoken, if any.
    pub speaking: Option<ExchangeId>,
    /// The exchange targeted by edit mode, if any.
    pub editing: Option<ExchangeId>,
    /// The current input buffer contents.
    pub input: String,
}

/// Handle to the transcript controller.
///
/// The controller owns the transcript and every interaction flag. All
/// mutations are funneled through one event loop task: asynchronous
/// completions re-enter as events, so each of them is applied
/// atomically with respect to the others and torn reads are
/// impossible.
pub struct Controller {
    event_tx: mpsc::UnboundedSender<Event>,
    kill_tx: watch::Sender<bool>,
}

impl Controller {
    pub(crate) fn spawn_from_builder(builder: ControllerBuilder) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        let state = ControllerState::from_builder(builder, event_tx.clone());
        tokio::spawn(
            run_controller(state, event_rx, kill_rx)
                .instrument(trace_span!("controller")),
        );
        Self { event_tx, kill_tx }
    }

    #[inline]
    fn send(&self, event: Event) {
        self.event_tx
            .send(event)
            .expect("controller task has been dropped too early");
    }

    /// Submits input text: appends a new exchange, or rewrites the
    /// armed edit target. Blank input is a no-op.
    #[inline]
    pub fn submit<S: Into<String>>(&self, text: S) {
        self.send(Event::Submit { text: text.into() });
    }

    /// Loads an exchange's user text into the input buffer and arms
    /// edit mode for it.
    ///
    /// The id must name a live exchange; passing anything else is a
    /// programming error.
    #[inline]
    pub fn begin_edit(&self, id: ExchangeId) {
        self.send(Event::BeginEdit { id });
    }

    /// Empties the transcript and stops any speech playback.
    #[inline]
    pub fn clear(&self) {
        self.send(Event::Clear);
    }

    /// Serializes the transcript through the configured export sink.
    #[inline]
    pub fn export_transcript(&self) {
        self.send(Event::Export);
    }

    /// Starts a one-shot voice capture whose transcript is submitted
    /// directly.
    #[inline]
    pub fn voice_capture(&self) {
        self.send(Event::VoiceCapture);
    }

    /// Starts speaking an exchange's reply, or stops it if that
    /// exchange is the one currently speaking.
    #[inline]
    pub fn toggle_speech(&self, id: ExchangeId) {
        self.send(Event::ToggleSpeech { id });
    }

    /// Returns a read-only copy of the current state.
    pub async fn snapshot(&self) -> Snapshot {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Query(tx));
        rx.await
            .expect("controller task has been dropped too early")
    }

    /// Attempts to stop the controller task.
    ///
    /// The task is not guaranteed to stop immediately, but it will not
    /// handle further events.
    #[inline]
    pub fn try_kill(&self) {
        self.kill_tx.send(true).ok();
    }
}

async fn run_controller(
    mut state: ControllerState,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        let event = select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                event
            }
        };
        trace!("received event: {event:?}");
        state.handle(event);
    }
    debug!("will terminate");
}

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use banter_model::ErrorKind;
use banter_speech::{
    RecognizeError, RecognizeErrorKind, SpeechRecognizer, SpeechSynthesizer,
    SynthesisError, Utterance, Voice,
};
use banter_test_model::{PresetReply, TestGenerationProvider};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::ControllerBuilder;
use crate::export::ExportSink;
use crate::extract::GENERATION_FAILED_TEXT;
use crate::transcript::Role;

async fn wait_idle(idle_rx: &mut mpsc::UnboundedReceiver<()>) {
    timeout(Duration::from_millis(500), idle_rx.recv())
        .await
        .expect("controller did not settle in time")
        .expect("idle channel closed");
}

fn builder_with_idle(
    provider: TestGenerationProvider,
) -> (ControllerBuilder, mpsc::UnboundedReceiver<()>) {
    let (idle_tx, idle_rx) = mpsc::unbounded_channel();
    let builder = ControllerBuilder::with_generation_provider(provider)
        .on_idle(move || {
            idle_tx.send(()).ok();
        });
    (builder, idle_rx)
}

#[derive(Clone, Default)]
struct FakeSynthesizer {
    spoken: Arc<Mutex<Vec<Utterance>>>,
    cancels: Arc<AtomicUsize>,
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        vec![
            Voice::new("Test Male", "en-US"),
            Voice::new("Test Female", "en-US"),
        ]
    }

    fn speak(
        &self,
        utterance: Utterance,
    ) -> impl Future<Output = Result<(), SynthesisError>> + Send + 'static
    {
        self.spoken.lock().unwrap().push(utterance);
        // Playback never finishes on its own in these tests; it only
        // stops through explicit cancellation.
        std::future::pending::<Result<(), SynthesisError>>()
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::Relaxed);
    }
}

struct FakeRecognizer {
    transcript: Option<String>,
}

impl SpeechRecognizer for FakeRecognizer {
    fn recognize(
        &self,
    ) -> impl Future<Output = Result<String, RecognizeError>> + Send + 'static
    {
        let result = match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => Err(RecognizeError::new(
                RecognizeErrorKind::NoSpeech,
                "no speech was detected",
            )),
        };
        std::future::ready(result)
    }
}

#[derive(Clone, Default)]
struct CaptureSink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl ExportSink for CaptureSink {
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<()> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_owned(), contents.to_vec()));
        Ok(())
    }
}

#[tokio::test]
async fn test_submit_appends_exchange() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("Hello", PresetReply::text("Hi, how can I help?"));
    provider.add_reply("Tell me a joke", PresetReply::text("No."));

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    controller.submit("Hello");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.exchanges.len(), 1);
    let exchange = &snapshot.exchanges[0];
    assert_eq!(exchange.user.role, Role::User);
    assert_eq!(exchange.user.text, "Hello");
    let reply = exchange.reply.as_ref().unwrap();
    assert_eq!(reply.role, Role::Model);
    assert_eq!(reply.text, "Hi, how can I help?");

    // A second turn leaves the first untouched.
    controller.submit("Tell me a joke");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.exchanges.len(), 2);
    assert_eq!(snapshot.exchanges[0].user.text, "Hello");
    assert_eq!(
        snapshot.exchanges[1].reply.as_ref().unwrap().text,
        "No."
    );
}

#[tokio::test]
async fn test_blank_input_is_a_noop() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("ping", PresetReply::text("pong"));

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    // Blank submits never reach the provider; if they did, the
    // unscripted prompts would settle as extra placeholder exchanges.
    controller.submit("");
    controller.submit("   ");
    controller.submit(" \t\n");
    controller.submit("ping");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.exchanges.len(), 1);
    assert_eq!(snapshot.exchanges[0].user.text, "ping");
    assert_eq!(snapshot.exchanges[0].reply.as_ref().unwrap().text, "pong");
}

#[tokio::test]
async fn test_edit_replaces_the_paired_reply() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("a", PresetReply::text("A"));
    provider.add_reply("b", PresetReply::text("B"));

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    controller.submit("a");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    let id = snapshot.exchanges[0].id;
    let created = snapshot.exchanges[0].user.timestamp;

    controller.begin_edit(id);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.editing, Some(id));
    assert_eq!(snapshot.input, "a");

    controller.submit("b");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.editing, None);
    assert_eq!(snapshot.exchanges.len(), 1);
    let exchange = &snapshot.exchanges[0];
    assert_eq!(exchange.user.text, "b");
    // An in-place edit keeps the original creation time.
    assert_eq!(exchange.user.timestamp, created);
    assert_eq!(exchange.reply.as_ref().unwrap().text, "B");
}

#[tokio::test]
async fn test_failed_call_settles_as_placeholder_reply() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply(
        "Hi",
        PresetReply::failure(ErrorKind::RateLimitExceeded),
    );

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    controller.submit("Hi");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.loading);
    let reply = snapshot.exchanges[0].reply.as_ref().unwrap();
    assert_eq!(reply.text, GENERATION_FAILED_TEXT);
    assert!(reply.images.is_empty());
    assert!(reply.urls.is_empty());
}

#[tokio::test]
async fn test_reply_links_are_extracted() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply(
        "show me",
        PresetReply::text(
            "See http://x.com/cat.png and http://blog.example.com",
        ),
    );

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    controller.submit("show me");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    let reply = snapshot.exchanges[0].reply.as_ref().unwrap();
    assert_eq!(reply.images, ["http://x.com/cat.png"]);
    assert_eq!(
        reply.urls,
        ["http://x.com/cat.png", "http://blog.example.com"]
    );
}

#[tokio::test]
async fn test_clear_discards_the_inflight_reply() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("a", PresetReply::text("A"));
    provider.set_delay(Duration::from_millis(50));

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.build();

    controller.submit("a");
    controller.clear();
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.loading);
    assert!(snapshot.exchanges.is_empty());
    assert_eq!(snapshot.editing, None);
}

#[tokio::test]
async fn test_toggle_speech_starts_and_stops() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("Hi", PresetReply::text("Hello there."));

    let synthesizer = FakeSynthesizer::default();
    let spoken = Arc::clone(&synthesizer.spoken);
    let cancels = Arc::clone(&synthesizer.cancels);

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.with_synthesizer(synthesizer).build();

    controller.submit("Hi");
    wait_idle(&mut idle_rx).await;
    let id = controller.snapshot().await.exchanges[0].id;

    controller.toggle_speech(id);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.speaking, Some(id));

    {
        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Hello there.");
        assert_eq!(spoken[0].lang, "en-US");
        assert_eq!(spoken[0].rate, 1.0);
        assert_eq!(spoken[0].pitch, 1.0);
        // The female-name heuristic wins over the engine default.
        assert_eq!(spoken[0].voice.as_ref().unwrap().name, "Test Female");
    }

    // Toggling the speaking exchange again stops it.
    controller.toggle_speech(id);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.speaking, None);
    assert_eq!(cancels.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn test_at_most_one_exchange_speaks() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("one", PresetReply::text("first reply"));
    provider.add_reply("two", PresetReply::text("second reply"));

    let synthesizer = FakeSynthesizer::default();
    let spoken = Arc::clone(&synthesizer.spoken);

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.with_synthesizer(synthesizer).build();

    controller.submit("one");
    wait_idle(&mut idle_rx).await;
    controller.submit("two");
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    let first = snapshot.exchanges[0].id;
    let second = snapshot.exchanges[1].id;

    controller.toggle_speech(first);
    controller.toggle_speech(second);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.speaking, Some(second));
    assert_eq!(spoken.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_clear_cancels_speech() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("Hi", PresetReply::text("Hello there."));

    let synthesizer = FakeSynthesizer::default();
    let cancels = Arc::clone(&synthesizer.cancels);

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.with_synthesizer(synthesizer).build();

    controller.submit("Hi");
    wait_idle(&mut idle_rx).await;
    let id = controller.snapshot().await.exchanges[0].id;

    controller.toggle_speech(id);
    controller.clear();

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.speaking, None);
    assert!(snapshot.exchanges.is_empty());
    assert_eq!(cancels.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn test_export_is_a_pure_snapshot() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("hi", PresetReply::text("hello"));

    let sink = CaptureSink::default();
    let saved = Arc::clone(&sink.saved);

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder.with_export_sink(sink).build();

    controller.submit("hi");
    wait_idle(&mut idle_rx).await;

    controller.export_transcript();
    let before = controller.snapshot().await;

    let saved = saved.lock().unwrap();
    let (file_name, contents) = &saved[0];
    assert_eq!(file_name, "chat-history.txt");
    assert_eq!(contents, b"You: hi\nGemini: hello");

    // Export mutates nothing.
    assert_eq!(before.exchanges.len(), 1);
    assert!(!before.loading);
    assert_eq!(before.editing, None);
}

#[tokio::test]
async fn test_voice_capture_submits_the_transcript() {
    let mut provider = TestGenerationProvider::default();
    provider.add_reply("Hello", PresetReply::text("Hi!"));

    let listening_events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&listening_events);

    let (builder, mut idle_rx) = builder_with_idle(provider);
    let controller = builder
        .with_recognizer(FakeRecognizer {
            transcript: Some("Hello".to_owned()),
        })
        .on_listening(move |listening| {
            recorded.lock().unwrap().push(listening);
        })
        .build();

    controller.voice_capture();
    wait_idle(&mut idle_rx).await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.listening);
    assert_eq!(snapshot.exchanges.len(), 1);
    assert_eq!(snapshot.exchanges[0].user.text, "Hello");
    assert_eq!(snapshot.exchanges[0].reply.as_ref().unwrap().text, "Hi!");
    assert_eq!(*listening_events.lock().unwrap(), [true, false]);
}

#[tokio::test]
async fn test_voice_capture_without_recognizer_alerts() {
    let provider = TestGenerationProvider::default();

    let alerted = Arc::new(AtomicBool::new(false));
    let alerted_flag = Arc::clone(&alerted);

    let (builder, _idle_rx) = builder_with_idle(provider);
    let controller = builder
        .on_alert(move |_| {
            alerted_flag.store(true, Ordering::Relaxed);
        })
        .build();

    controller.voice_capture();
    let snapshot = controller.snapshot().await;
    assert!(alerted.load(Ordering::Relaxed));
    assert!(!snapshot.listening);
}

#[tokio::test]
async fn test_recognition_error_returns_to_idle() {
    let provider = TestGenerationProvider::default();

    let (listening_tx, mut listening_rx) = mpsc::unbounded_channel();

    let (builder, _idle_rx) = builder_with_idle(provider);
    let controller = builder
        .with_recognizer(FakeRecognizer { transcript: None })
        .on_listening(move |listening| {
            listening_tx.send(listening).ok();
        })
        .build();

    controller.voice_capture();

    let started = timeout(Duration::from_millis(500), listening_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(started);
    let stopped = timeout(Duration::from_millis(500), listening_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(!stopped);

    // The error is absorbed: nothing was submitted.
    let snapshot = controller.snapshot().await;
    assert!(snapshot.exchanges.is_empty());
}

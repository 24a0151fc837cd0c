//! A terminal chat client backed by the Gemini API.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use banter::core::Snapshot;
use banter::core::export::EXPORT_FILE_NAME;
use banter::core::transcript::{Exchange, ExchangeId};
use banter::overlay::PresenceOverlay;
use banter::speech::{CommandRecognizer, CommandSynthesizer};
use banter::{Session, SessionBuilder};
use banter_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use banter_speech::{SPEECH_LANG, Voice};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Exchange(Exchange),
    Speaking(Option<ExchangeId>),
    Listening(bool),
    Alert(String),
}

enum Command<'a> {
    Submit(&'a str),
    Suggestion(usize),
    Edit(usize),
    Say(usize),
    Voice,
    List,
    Clear,
    Export,
    Help,
    Quit,
    Unknown(&'a str),
}

const BAR_CHAR: &str = "▎";

const THINKING_MSG: &str = "🤔 Thinking...";
const LISTENING_MSG: &str = "🎤 Listening...";

const SUGGESTIONS: &[&str] = &[
    "What is AI?",
    "Tell me a joke",
    "How does machine learning work?",
    "Who invented the internet?",
];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("GEMINI_API_KEY") else {
        eprintln!("GEMINI_API_KEY environment variable is not set");
        return;
    };
    let mut config_builder = GeminiConfigBuilder::with_api_key(api_key);
    if let Ok(model) = env::var("GEMINI_MODEL") {
        config_builder = config_builder.with_model(model);
    }
    if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    let provider = GeminiProvider::new(config_builder.build());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session_builder =
        SessionBuilder::with_generation_provider(provider)
            .on_idle({
                let event_tx = event_tx.clone();
                move || {
                    event_tx.send(SessionEvent::Idle).ok();
                }
            })
            .on_exchange({
                let event_tx = event_tx.clone();
                move |exchange| {
                    event_tx
                        .send(SessionEvent::Exchange(exchange.clone()))
                        .ok();
                }
            })
            .on_speaking({
                let event_tx = event_tx.clone();
                move |speaking| {
                    event_tx.send(SessionEvent::Speaking(speaking)).ok();
                }
            })
            .on_listening({
                let event_tx = event_tx.clone();
                move |listening| {
                    event_tx.send(SessionEvent::Listening(listening)).ok();
                }
            })
            .on_alert({
                let event_tx = event_tx.clone();
                move |message| {
                    event_tx
                        .send(SessionEvent::Alert(message.to_owned()))
                        .ok();
                }
            });

    if let Ok(cmdline) = env::var("BANTER_STT_CMD") {
        session_builder =
            session_builder.with_recognizer(CommandRecognizer::new(cmdline));
    }
    if let Ok(program) = env::var("BANTER_TTS_CMD") {
        session_builder = session_builder
            .with_synthesizer(CommandSynthesizer::new(program, voices_from_env()));
    }

    let session = session_builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut overlay = PresenceOverlay::new();

    print_welcome();

    'outer: loop {
        drain_events(&mut event_rx, &mut overlay);

        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim().to_owned();
        if line.is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Quit => break 'outer,
            Command::Help => print_help(),
            Command::List => {
                let snapshot = session.snapshot().await;
                render_transcript(&snapshot);
            }
            Command::Clear => {
                session.clear();
                println!("(transcript cleared)");
            }
            Command::Export => {
                session.export_transcript();
                // The snapshot round trip guarantees the file is on
                // disk before we claim it is.
                session.snapshot().await;
                println!("(exported to {EXPORT_FILE_NAME})");
            }
            Command::Edit(n) => {
                let snapshot = session.snapshot().await;
                let Some(id) = exchange_id_by_ordinal(&snapshot, n) else {
                    println!("no exchange #{n}");
                    continue;
                };
                session.begin_edit(id);
                let snapshot = session.snapshot().await;
                println!("editing #{n}: {}", snapshot.input);
                println!("(the next message replaces it)");
            }
            Command::Say(n) => {
                let snapshot = session.snapshot().await;
                let Some(id) = exchange_id_by_ordinal(&snapshot, n) else {
                    println!("no exchange #{n}");
                    continue;
                };
                session.toggle_speech(id);
                session.snapshot().await;
            }
            Command::Voice => {
                session.voice_capture();
                if !drive_until_idle(
                    &session,
                    &mut event_rx,
                    &mut overlay,
                    &progress_style,
                    LISTENING_MSG,
                )
                .await
                {
                    break 'outer;
                }
            }
            Command::Suggestion(n) => {
                let Some(suggestion) =
                    n.checked_sub(1).and_then(|idx| SUGGESTIONS.get(idx))
                else {
                    println!("no suggestion #{n}");
                    continue;
                };
                println!("> {suggestion}");
                session.send_message(suggestion);
                if !drive_until_idle(
                    &session,
                    &mut event_rx,
                    &mut overlay,
                    &progress_style,
                    THINKING_MSG,
                )
                .await
                {
                    break 'outer;
                }
            }
            Command::Submit(text) => {
                session.send_message(text);
                if !drive_until_idle(
                    &session,
                    &mut event_rx,
                    &mut overlay,
                    &progress_style,
                    THINKING_MSG,
                )
                .await
                {
                    break 'outer;
                }
            }
            Command::Unknown(command) => {
                println!("unknown command: {command} (try /help)");
            }
        }
    }
}

/// Waits for the session to settle, spinning a progress indicator and
/// rendering whatever arrives in the meantime. Returns `false` when the
/// event channel has closed.
async fn drive_until_idle(
    session: &Session,
    event_rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    overlay: &mut PresenceOverlay,
    progress_style: &ProgressStyle,
    message: &str,
) -> bool {
    let mut progress_bar = None;

    loop {
        // Create a new progress bar if it has been finished.
        progress_bar
            .get_or_insert_with(|| {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.set_style(progress_style.clone());
                progress_bar.set_message(message.to_owned());
                progress_bar
            })
            .inc(1);

        let tick = sleep(Duration::from_millis(100));
        let event = select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    return false;
                };
                event
            }
            _ = tick => {
                continue;
            }
        };

        // Finish the progress bar before printing anything else.
        if let Some(progress_bar) = progress_bar.take() {
            progress_bar.finish_and_clear();
        }

        match event {
            SessionEvent::Idle => return true,
            SessionEvent::Exchange(exchange) => render_reply(&exchange),
            SessionEvent::Speaking(speaking) => {
                overlay.set_speaking(speaking.is_some());
            }
            SessionEvent::Listening(listening) => {
                // When recognition ends without a submission taking
                // over, there is no settle to wait for.
                if !listening && !session.snapshot().await.loading {
                    return true;
                }
            }
            SessionEvent::Alert(message) => {
                println!("{}⚠️  {}", BAR_CHAR.bright_yellow(), message);
                if !session.snapshot().await.loading {
                    return true;
                }
            }
        }
    }
}

/// Applies any events that arrived while the prompt was blocked on the
/// keyboard, most notably speech playback running out on its own.
fn drain_events(
    event_rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    overlay: &mut PresenceOverlay,
) {
    while let Ok(event) = event_rx.try_recv() {
        match event {
            SessionEvent::Speaking(speaking) => {
                overlay.set_speaking(speaking.is_some());
            }
            SessionEvent::Alert(message) => {
                println!("{}⚠️  {}", BAR_CHAR.bright_yellow(), message);
            }
            SessionEvent::Idle
            | SessionEvent::Exchange(_)
            | SessionEvent::Listening(_) => {}
        }
    }
}

fn parse_command(line: &str) -> Command<'_> {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Submit(line);
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let ordinal = parts.next().and_then(|arg| arg.parse().ok());
    match (name, ordinal) {
        ("s" | "suggest", Some(n)) => Command::Suggestion(n),
        ("edit", Some(n)) => Command::Edit(n),
        ("say", Some(n)) => Command::Say(n),
        ("voice", _) => Command::Voice,
        ("list", _) => Command::List,
        ("clear", _) => Command::Clear,
        ("export", _) => Command::Export,
        ("help", _) => Command::Help,
        ("quit" | "q", _) => Command::Quit,
        _ => Command::Unknown(line),
    }
}

fn exchange_id_by_ordinal(
    snapshot: &Snapshot,
    ordinal: usize,
) -> Option<ExchangeId> {
    ordinal
        .checked_sub(1)
        .and_then(|idx| snapshot.exchanges.get(idx))
        .map(|exchange| exchange.id)
}

fn render_reply(exchange: &Exchange) {
    let Some(reply) = &exchange.reply else {
        return;
    };
    let bar = BAR_CHAR.bright_cyan();
    println!("{bar}🤖 {}", reply.text.bright_white());
    for image in &reply.images {
        println!("{bar}   🖼  {}", image.underline());
    }
    for url in &reply.urls {
        println!("{bar}   🔗 {}", url.underline());
    }
    let time = reply.timestamp.with_timezone(&Local).format("%H:%M:%S");
    println!("{bar}   {}", time.to_string().dimmed());
}

fn render_transcript(snapshot: &Snapshot) {
    if snapshot.exchanges.is_empty() {
        println!("(the transcript is empty)");
        return;
    }
    for (idx, exchange) in snapshot.exchanges.iter().enumerate() {
        let n = idx + 1;
        let time = exchange
            .user
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S");
        println!(
            "#{n} {} [{time}]: {}",
            exchange.user.role.speaker_label().bright_green(),
            exchange.user.text
        );
        if let Some(reply) = &exchange.reply {
            let speak_icon = if snapshot.speaking == Some(exchange.id) {
                "⏹"
            } else {
                "🔊"
            };
            println!(
                "   {} {speak_icon} {}",
                reply.role.speaker_label().bright_cyan(),
                reply.text
            );
        }
    }
}

fn print_welcome() {
    println!("{}", "💬 banter".bold());
    println!("Type a message, or /help for commands.");
    println!();
    println!("{}", "Suggested:".bold());
    for (idx, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  /s {}  {suggestion}", idx + 1);
    }
    println!();
}

fn print_help() {
    println!("  <text>      send a message");
    println!("  /s <n>      send a suggested prompt");
    println!("  /list       show the transcript");
    println!("  /edit <n>   rewrite your side of exchange n");
    println!("  /say <n>    speak (or stop speaking) reply n");
    println!("  /voice      dictate a message");
    println!("  /clear      clear the transcript");
    println!("  /export     save the transcript to {EXPORT_FILE_NAME}");
    println!("  /quit       leave");
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

fn voices_from_env() -> Vec<Voice> {
    let Ok(names) = env::var("BANTER_TTS_VOICES") else {
        return vec![];
    };
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Voice::new(name, SPEECH_LANG))
        .collect()
}

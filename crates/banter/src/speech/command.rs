use std::env;
use std::process::Stdio;

use banter_speech::{
    RecognizeError, RecognizeErrorKind, SpeechRecognizer, SpeechSynthesizer,
    SynthesisError, Utterance, Voice,
};
use tokio::process::Command;
use tokio::select;
use tokio::sync::watch;

#[inline]
fn create_command_with_inferred_shell() -> Command {
    let Some(shell) = env::var_os("SHELL") else {
        return Command::new("/bin/sh");
    };
    Command::new(shell)
}

/// A speech recognizer backed by an external command.
///
/// The command is expected to capture one phrase of audio and print the
/// final transcript on stdout, then exit. It runs through the user's
/// shell so pipelines work.
pub struct CommandRecognizer {
    cmdline: String,
}

impl CommandRecognizer {
    /// Creates a recognizer that runs the given command line.
    #[inline]
    pub fn new<S: Into<String>>(cmdline: S) -> Self {
        Self {
            cmdline: cmdline.into(),
        }
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn recognize(
        &self,
    ) -> impl Future<Output = Result<String, RecognizeError>> + Send + 'static
    {
        let cmdline = self.cmdline.clone();
        async move {
            let output = create_command_with_inferred_shell()
                .arg("-c")
                .arg(&cmdline)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|err| {
                    RecognizeError::new(
                        RecognizeErrorKind::AudioCapture,
                        format!("failed to run the recognizer: {err}"),
                    )
                })?;

            if !output.status.success() {
                return Err(RecognizeError::new(
                    RecognizeErrorKind::Other,
                    format!("recognizer exited with {}", output.status),
                ));
            }

            let transcript =
                String::from_utf8_lossy(&output.stdout).trim().to_owned();
            if transcript.is_empty() {
                return Err(RecognizeError::new(
                    RecognizeErrorKind::NoSpeech,
                    "no speech was recognized",
                ));
            }
            Ok(transcript)
        }
    }
}

/// A speech synthesizer backed by an external command.
///
/// Each utterance runs `<program> [-v <voice>] <text>`; killing the
/// child is how playback gets cancelled. The engine's voice inventory
/// is configuration rather than probed, since the program is opaque.
pub struct CommandSynthesizer {
    program: String,
    voices: Vec<Voice>,
    cancel_tx: watch::Sender<u64>,
}

impl CommandSynthesizer {
    /// Creates a synthesizer that runs the given program with the
    /// given voice inventory.
    pub fn new<S: Into<String>>(program: S, voices: Vec<Voice>) -> Self {
        let (cancel_tx, _) = watch::channel(0);
        Self {
            program: program.into(),
            voices,
            cancel_tx,
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(
        &self,
        utterance: Utterance,
    ) -> impl Future<Output = Result<(), SynthesisError>> + Send + 'static
    {
        let program = self.program.clone();
        // A fresh subscription only observes cancels issued after this
        // utterance started.
        let mut cancel_rx = self.cancel_tx.subscribe();
        async move {
            let mut command = Command::new(&program);
            if let Some(voice) = &utterance.voice {
                command.arg("-v").arg(&voice.name);
            }
            let mut child = command
                .arg(&utterance.text)
                .stdin(Stdio::null())
                .spawn()
                .map_err(|err| {
                    SynthesisError::new(format!(
                        "failed to start the synthesizer: {err}"
                    ))
                })?;

            select! {
                status = child.wait() => {
                    let status = status.map_err(|err| {
                        SynthesisError::new(format!("{err}"))
                    })?;
                    if !status.success() {
                        return Err(SynthesisError::new(format!(
                            "synthesizer exited with {status}"
                        )));
                    }
                    Ok(())
                }
                _ = cancel_rx.changed() => {
                    child.start_kill().ok();
                    child.wait().await.ok();
                    Ok(())
                }
            }
        }
    }

    fn cancel(&self) {
        self.cancel_tx.send_modify(|epoch| *epoch += 1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, timeout};

    use super::*;

    #[tokio::test]
    async fn test_recognizer_returns_trimmed_stdout() {
        let recognizer = CommandRecognizer::new("echo ' Hello there '");
        let transcript = recognizer.recognize().await.unwrap();
        assert_eq!(transcript, "Hello there");
    }

    #[tokio::test]
    async fn test_recognizer_empty_output_is_no_speech() {
        let recognizer = CommandRecognizer::new("printf ''");
        let err = recognizer.recognize().await.unwrap_err();
        assert_eq!(err.kind(), RecognizeErrorKind::NoSpeech);
    }

    #[tokio::test]
    async fn test_recognizer_failure_is_reported() {
        let recognizer = CommandRecognizer::new("exit 3");
        let err = recognizer.recognize().await.unwrap_err();
        assert_eq!(err.kind(), RecognizeErrorKind::Other);
    }

    #[tokio::test]
    async fn test_cancel_stops_playback() {
        let synthesizer = CommandSynthesizer::new("sleep", vec![]);
        let playback = tokio::spawn(synthesizer.speak(Utterance::new("5")));

        sleep(Duration::from_millis(50)).await;
        synthesizer.cancel();

        let result = timeout(Duration::from_secs(1), playback)
            .await
            .expect("cancel did not stop playback")
            .unwrap();
        assert!(result.is_ok());
    }
}

//! Command-backed speech capabilities.
//!
//! The speech engines are external programs, the same way they are an
//! external concern for a browser page: the recognizer command captures
//! one phrase and prints its transcript, the synthesizer command plays
//! the text it is handed.

mod command;

pub use command::{CommandRecognizer, CommandSynthesizer};

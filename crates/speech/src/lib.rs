//! An abstraction layer for the speech capabilities.
//!
//! Speech recognition and synthesis are external collaborators of the
//! chat client: audio comes in, a transcript comes out, or text goes in
//! and audio plays somewhere. This crate defines the traits those
//! capabilities must satisfy, plus the voice descriptors and the
//! deterministic voice-preference rule the client applies.
//!
//! Like the generation abstraction, types here define no behavior of
//! their own.

#![deny(missing_docs)]

mod recognizer;
mod synthesizer;
mod voice;

pub use recognizer::*;
pub use synthesizer::*;
pub use voice::*;

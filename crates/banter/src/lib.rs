//! An out-of-the-box chat client that assembles the transcript
//! controller, the Gemini provider, and command-backed speech
//! capabilities.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you
//! can also use it as a library to bring the session into your own
//! host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod export;
pub mod overlay;
mod session;
pub mod speech;

pub use export::FileExportSink;
pub use session::{Session, SessionBuilder};

/// Re-exports of [`banter_core`] crate.
pub mod core {
    pub use banter_core::*;
}

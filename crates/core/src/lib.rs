//! Core logic of the chat client: the transcript, reply link
//! extraction, transcript export, and the controller event loop that
//! owns every state transition.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod export;
pub mod extract;
mod generation_client;
mod speech_client;
pub mod transcript;

pub use controller::{Controller, ControllerBuilder, Snapshot};

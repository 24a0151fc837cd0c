//! An abstraction layer for text-generation services.
//!
//! This crate establishes an unified protocol for the chat client to
//! talk to a remote generation capability, so that the transcript logic
//! can be wired to different backends (the vendor endpoint, a server-side
//! proxy, a scripted fake) without modification.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. Every request is
//! single-turn: the provider receives one prompt and resolves with one
//! finished reply, with no server-side session in between.

#![deny(missing_docs)]

mod error;
mod provider;
mod reply;
mod request;

pub use error::*;
pub use provider::*;
pub use reply::*;
pub use request::*;

//! A terminal front-end for the symptom chat.
//!
//! The crate includes a CLI tool for using in the terminal. The pieces it is
//! made of (command parsing, prompt reading and transcript rendering) are
//! exposed as a library, so other terminal hosts can reuse them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod command;
mod input;
mod render;

pub use command::{Command, parse_command};
pub use input::PromptReader;
pub use render::{TranscriptPrinter, render_message};

/// Re-exports of [`symptom_chat_core`] crate.
pub mod core {
    pub use symptom_chat_core::*;
}

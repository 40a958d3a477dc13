//! Core logic of the symptom chat: the transcript, the query cycle around
//! it, and the controller a front-end drives.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
mod dispatcher;
mod error;
mod formatter;
pub mod log;
pub mod message;
mod query_client;

pub use controller::{ConversationBuilder, ConversationController, Snapshot};
pub use error::ControllerClosedError;
pub use formatter::{CONDITIONS_TITLE, ConditionEntry, Segment, format_conditions};

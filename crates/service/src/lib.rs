//! The protocol between the conversation core and a symptom query service.
//!
//! A query service takes a free-text description of symptoms and answers
//! with a natural-language summary, plus an ordered list of candidate
//! conditions. How the service comes up with the answer is none of the
//! conversation's business, so this crate only fixes the shape of the
//! exchange.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod reply;
mod service;

pub use error::*;
pub use reply::*;
pub use service::*;

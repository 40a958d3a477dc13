use std::error::Error;
use std::fmt;

/// A type of error which can be returned whenever operations are sent to
/// a conversation whose task has stopped.
pub struct ControllerClosedError;

impl fmt::Debug for ControllerClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClosedError").finish()
    }
}

impl fmt::Display for ControllerClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the conversation task has stopped".fmt(f)
    }
}

impl Error for ControllerClosedError {}

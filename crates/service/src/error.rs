use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service could not be reached, or the connection broke.
    Transport,
    /// The service answered with a non-successful status.
    Status,
    /// The service answered, but the payload could not be understood.
    Malformed,
    /// The service did not answer in time.
    Timeout,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Status => write!(f, "Unsuccessful status"),
            ErrorKind::Malformed => write!(f, "Malformed payload"),
            ErrorKind::Timeout => write!(f, "Timed out"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}

use std::error::Error;

use crate::error::ErrorKind;
use crate::reply::QueryReply;

/// The error type for a query service.
pub trait QueryServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A remote service that answers symptom queries.
///
/// Once the service is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the service should be prepared for being dropped anytime.
pub trait QueryService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: QueryServiceError;

    /// Sends the symptom description to the service.
    ///
    /// The returned future must be fully independent of `self`.
    fn query(
        &self,
        symptoms: &str,
    ) -> impl Future<Output = Result<QueryReply, Self::Error>> + Send + 'static;
}

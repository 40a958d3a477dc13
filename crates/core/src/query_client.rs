use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use symptom_chat_service::{
    ErrorKind, QueryReply, QueryService, QueryServiceError,
};
use tracing::Instrument;

pub type QueryResult = Result<QueryReply, Box<dyn QueryServiceError>>;
pub type BoxedQueryFuture = Pin<Box<dyn Future<Output = QueryResult> + Send>>;
type HandlerFn = Arc<dyn Fn(String) -> BoxedQueryFuture + Send + Sync>;

/// A wrapper around a query service that provides a type-erased interface
/// for the other modules, and applies the optional timeout.
#[derive(Clone)]
pub struct QueryClient {
    handler_fn: HandlerFn,
}

impl QueryClient {
    pub fn new<S: QueryService + 'static>(
        service: S,
        timeout: Option<Duration>,
    ) -> Self {
        // We have to erase the type `S`, since `QueryClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn =
            Arc::new(move |symptoms: String| -> BoxedQueryFuture {
                let fut = service.query(&symptoms);
                Box::pin(
                    wait_for_reply(symptoms, fut, timeout)
                        .instrument(trace_span!("query client req")),
                )
            });
        Self { handler_fn }
    }

    /// Issues the query right away and returns the future of its result.
    ///
    /// The service sees the query before this method returns; awaiting the
    /// returned future only waits for the answer.
    #[inline]
    pub fn query(&self, symptoms: &str) -> BoxedQueryFuture {
        (self.handler_fn)(symptoms.to_owned())
    }
}

async fn wait_for_reply<F, E>(
    symptoms: String,
    fut: F,
    timeout: Option<Duration>,
) -> QueryResult
where
    F: Future<Output = Result<QueryReply, E>>,
    E: QueryServiceError,
{
    trace!("got a query: {symptoms:?}");
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                debug!("query timed out after {limit:?}");
                return Err(Box::new(TimeoutError(limit))
                    as Box<dyn QueryServiceError>);
            }
        },
        None => fut.await,
    };
    result.map_err(|err| {
        debug!("got an error: {err:?}");
        Box::new(err) as Box<dyn QueryServiceError>
    })
}

/// The service did not answer within the configured limit.
#[derive(Debug)]
pub struct TimeoutError(Duration);

impl Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no answer within {:?}", self.0)
    }
}

impl Error for TimeoutError {}

impl QueryServiceError for TimeoutError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Timeout
    }
}

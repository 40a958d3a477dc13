//! A local fake query service for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use symptom_chat_service::{
    ErrorKind, QueryReply, QueryService, QueryServiceError,
};
use tokio::sync::Semaphore;
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl QueryServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Holds replies back until the test releases them.
///
/// See [`TestQueryService::hold_replies`].
#[derive(Clone)]
pub struct Latch(Arc<Semaphore>);

impl Latch {
    /// Lets exactly one held query settle.
    #[inline]
    pub fn release(&self) {
        self.0.add_permits(1);
    }
}

#[derive(Default)]
struct Stats {
    received: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Stats {
    fn enter(&self, symptoms: String) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(symptoms);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A local fake query service for testing purpose.
///
/// Before sending queries, you need to setup the script, which is how the
/// service should answer each query. The n-th query gets the n-th preset.
/// If there are no enough presets in the script, an error will be returned.
///
/// Clones share the query counter and statistics, so a test can keep a
/// clone around to inspect what the conversation has sent.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestQueryService {
    script: Vec<PresetReply>,
    delay: Option<Duration>,
    latch: Option<Arc<Semaphore>>,
    next_step: Arc<AtomicUsize>,
    stats: Arc<Stats>,
}

impl TestQueryService {
    /// Appends a preset to the script.
    #[inline]
    pub fn add_preset(&mut self, preset: PresetReply) {
        self.script.push(preset);
    }

    /// Appends a successful reply to the script.
    #[inline]
    pub fn add_reply(&mut self, reply: QueryReply) {
        self.add_preset(PresetReply::Reply(reply));
    }

    /// Sets how long each query takes before it settles. Defaults to 1ms.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Makes every query wait for a [`Latch::release`] before settling.
    pub fn hold_replies(&mut self) -> Latch {
        let semaphore = Arc::new(Semaphore::new(0));
        self.latch = Some(Arc::clone(&semaphore));
        Latch(semaphore)
    }

    /// Returns the symptoms received so far, in arrival order.
    pub fn received_queries(&self) -> Vec<String> {
        self.stats
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many queries were outstanding at the same time, at most.
    #[inline]
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl QueryService for TestQueryService {
    type Error = crate::Error;

    fn query(
        &self,
        symptoms: &str,
    ) -> impl Future<Output = Result<QueryReply, Self::Error>> + Send + 'static
    {
        let step_idx = self.next_step.fetch_add(1, Ordering::SeqCst);
        let preset = self.script.get(step_idx).cloned();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        let latch = self.latch.clone();
        let stats = Arc::clone(&self.stats);
        stats.enter(symptoms.to_owned());

        async move {
            sleep(delay).await;
            if let Some(latch) = latch {
                if let Ok(permit) = latch.acquire().await {
                    permit.forget();
                }
            }
            stats.leave();

            match preset {
                None => Err(Error::new("no enough presets", ErrorKind::Other)),
                Some(PresetReply::Reply(reply)) => Ok(reply),
                Some(PresetReply::TransportFailure(message)) => {
                    Err(Error::new(message, ErrorKind::Transport))
                }
                Some(PresetReply::Malformed) => Err(Error::new(
                    "expected value at line 1 column 1",
                    ErrorKind::Malformed,
                )),
            }
        }
    }
}

use std::time::Duration;

use symptom_chat_service::QueryService;
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::ConversationController;
use super::state::{self, ConversationState, Snapshot};
use crate::dispatcher::QueryDispatcher;
use crate::log::MessageLog;
use crate::query_client::QueryClient;

const DEFAULT_GREETING: &str =
    "Hello! Describe your symptoms and I'll suggest possible conditions.";
const DEFAULT_APOLOGY: &str = "Sorry, something went wrong while fetching a \
                               response. Please try again.";
const DEFAULT_SUGGESTIONS: &[&str] = &[
    "itching,fatigue,yellowish skin",
    "headache, fever, stiff neck",
    "cough, shortness of breath, chest pain",
    "abdominal pain, nausea, loss of appetite",
];

type MakeClientFn = Box<dyn FnOnce(Option<Duration>) -> QueryClient + Send>;

/// [`ConversationController`] builder.
pub struct ConversationBuilder {
    make_client: MakeClientFn,
    timeout: Option<Duration>,
    greeting: String,
    apology: String,
    suggestions: Vec<String>,
}

impl ConversationBuilder {
    /// Creates a new builder with the specified query service.
    #[inline]
    pub fn with_query_service<S: QueryService + 'static>(service: S) -> Self {
        Self {
            make_client: Box::new(move |timeout| {
                QueryClient::new(service, timeout)
            }),
            timeout: None,
            greeting: DEFAULT_GREETING.to_owned(),
            apology: DEFAULT_APOLOGY.to_owned(),
            suggestions: DEFAULT_SUGGESTIONS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }

    /// Sets the message the transcript starts with, and restarts with on
    /// clear.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the message shown in place of a reply when a query fails.
    #[inline]
    pub fn with_apology<S: Into<String>>(mut self, apology: S) -> Self {
        self.apology = apology.into();
        self
    }

    /// Gives up on a query that has not settled within `timeout`, turning
    /// it into a failure. Without it, a query may stay outstanding forever.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the example phrases offered to the user.
    #[inline]
    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the conversation and starts its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> ConversationController {
        let Self {
            make_client,
            timeout,
            greeting,
            apology,
            suggestions,
        } = self;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let log = MessageLog::with_greeting(greeting.as_str());
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot {
            messages: log.messages().to_vec(),
            ..Default::default()
        });
        let state = ConversationState {
            log,
            pending_input: String::new(),
            loading: false,
            dispatcher: QueryDispatcher::new(make_client(timeout), apology),
            greeting,
            cmd_tx: cmd_tx.downgrade(),
            snapshot_tx,
        };
        tokio::spawn(
            state::run(state, cmd_rx).instrument(debug_span!("conversation")),
        );

        ConversationController {
            cmd_tx,
            snapshot_rx,
            suggestions: suggestions.into(),
        }
    }
}

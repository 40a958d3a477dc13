//! The request/response cycle around a single outstanding query.

use std::fmt::{self, Debug};

use crate::formatter::format_conditions;
use crate::log::MessageLog;
use crate::message::{MessageContent, MessageKind, Sender};
use crate::query_client::{BoxedQueryFuture, QueryClient, QueryResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchStage {
    Idle,
    Submitting,
}

/// What a settlement did to the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The reply was appended.
    Resolved,
    /// The apology was appended.
    Failed,
    /// The query was started before the last clear, the log was left alone.
    Discarded,
}

/// Drives queries against the service, one at a time.
///
/// The client is moved into the outstanding query and handed back on
/// settlement, so a dispatcher without its client is by construction in
/// the `Submitting` stage and cannot start another query.
pub struct QueryDispatcher {
    client: Option<QueryClient>,
    apology: String,
    epoch: u64,
}

impl QueryDispatcher {
    pub fn new<S: Into<String>>(client: QueryClient, apology: S) -> Self {
        Self {
            client: Some(client),
            apology: apology.into(),
            epoch: 0,
        }
    }

    #[inline]
    pub fn stage(&self) -> DispatchStage {
        if self.client.is_some() {
            DispatchStage::Idle
        } else {
            DispatchStage::Submitting
        }
    }

    /// Starts a query for `text`.
    ///
    /// The user message and the typing placeholder are in the log when this
    /// returns, and the service has already been called with the trimmed
    /// text. Returns `None` without touching the log when the text is blank
    /// or another query is outstanding.
    pub fn submit(
        &mut self,
        log: &mut MessageLog,
        text: &str,
    ) -> Option<PendingQuery> {
        let symptoms = text.trim();
        if symptoms.is_empty() {
            debug!("ignoring blank input");
            return None;
        }
        let Some(client) = self.client.take() else {
            debug!("a query is outstanding, dropping {text:?}");
            return None;
        };

        log.append(Sender::User, MessageContent::Plain(text.to_owned()));
        log.append(Sender::Assistant, MessageContent::Typing);

        debug!("submitting query");
        let response = client.query(symptoms);
        Some(PendingQuery {
            client,
            epoch: self.epoch,
            response,
        })
    }

    /// Applies the result of a query to the log and returns to idle.
    pub fn settle(
        &mut self,
        log: &mut MessageLog,
        settlement: Settlement,
    ) -> SettleOutcome {
        let Settlement {
            client,
            epoch,
            result,
        } = settlement;
        self.client = Some(client);

        if epoch != self.epoch {
            warn!("discarding a reply to a query from before the last clear");
            return SettleOutcome::Discarded;
        }

        log.remove_where(|m| m.kind() == MessageKind::Typing);
        match result {
            Ok(reply) => {
                debug!(
                    "query resolved with {} condition(s)",
                    reply.conditions.len()
                );
                log.append(
                    Sender::Assistant,
                    MessageContent::Plain(reply.response),
                );
                if !reply.conditions.is_empty() {
                    let segments = format_conditions(&reply.conditions);
                    log.append(
                        Sender::Assistant,
                        MessageContent::Conditions(segments),
                    );
                }
                SettleOutcome::Resolved
            }
            Err(err) => {
                // The user only gets the apology, the detail stays here.
                error!("query failed ({}): {err}", err.kind());
                log.append(
                    Sender::Assistant,
                    MessageContent::Error(self.apology.clone()),
                );
                SettleOutcome::Failed
            }
        }
    }

    /// Makes the settlement of the outstanding query, if any, leave the log
    /// alone. Called when the conversation is cleared.
    #[inline]
    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }
}

/// A query that has been sent and not answered yet.
pub struct PendingQuery {
    client: QueryClient,
    epoch: u64,
    response: BoxedQueryFuture,
}

impl PendingQuery {
    /// Waits for the service. This never fails, failures are carried in
    /// the settlement.
    pub async fn wait(self) -> Settlement {
        let result = self.response.await;
        Settlement {
            client: self.client,
            epoch: self.epoch,
            result,
        }
    }
}

/// The answer to a [`PendingQuery`], to be handed to
/// [`QueryDispatcher::settle`].
pub struct Settlement {
    client: QueryClient,
    epoch: u64,
    result: QueryResult,
}

impl Debug for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settlement")
            .field("epoch", &self.epoch)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

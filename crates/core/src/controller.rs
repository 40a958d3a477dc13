mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::error::ControllerClosedError;
pub use builder::ConversationBuilder;
use state::Command;
pub use state::Snapshot;

/// Handle to a running conversation.
///
/// The conversation state lives in a task of its own, and every operation
/// on this handle is a command queued to that task. Commands are handled
/// one at a time in the order they were sent, so an operation is observed
/// by any [`ConversationController::snapshot`] requested after it.
///
/// Front-ends render from [`ConversationController::subscribe`], which
/// publishes a new [`Snapshot`] whenever the state changes. Handles are
/// cheap to clone; the task stops once every handle is dropped and no
/// query is outstanding.
#[derive(Clone)]
pub struct ConversationController {
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<Snapshot>,
    suggestions: Arc<[String]>,
}

impl ConversationController {
    /// Replaces the not-yet-submitted input. Allowed while loading.
    pub fn update_input<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), ControllerClosedError> {
        self.send(Command::UpdateInput(text.into()))
    }

    /// Submits the pending input.
    ///
    /// Blank input, or input submitted while a query is outstanding, is
    /// silently dropped.
    #[inline]
    pub fn submit(&self) -> Result<(), ControllerClosedError> {
        self.send(Command::Submit)
    }

    /// Resets the transcript to the greeting and clears the pending input.
    ///
    /// An outstanding query keeps running and still blocks submission until
    /// it settles, but its reply never reaches the new transcript.
    #[inline]
    pub fn clear(&self) -> Result<(), ControllerClosedError> {
        self.send(Command::Clear)
    }

    /// Puts an example phrase into the input without submitting it.
    #[inline]
    pub fn select_suggestion<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), ControllerClosedError> {
        self.update_input(text)
    }

    /// Returns the example phrases offered to the user.
    #[inline]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Subscribes to state changes.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Returns the state after every operation sent so far has been
    /// handled.
    pub async fn snapshot(&self) -> Result<Snapshot, ControllerClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| ControllerClosedError)
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), ControllerClosedError> {
        self.cmd_tx.send(cmd).map_err(|_| ControllerClosedError)
    }
}

use tokio::sync::{mpsc, oneshot, watch};

use crate::dispatcher::{DispatchStage, QueryDispatcher, Settlement};
use crate::log::MessageLog;
use crate::message::Message;

/// What the front-end gets to see of a conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// The transcript, oldest first.
    pub messages: Vec<Message>,
    /// The not-yet-submitted input.
    pub pending_input: String,
    /// Whether a query is outstanding.
    pub loading: bool,
}

#[derive(Debug)]
pub enum Command {
    UpdateInput(String),
    Submit,
    Clear,
    Settled(Settlement),
    Snapshot(oneshot::Sender<Snapshot>),
}

pub struct ConversationState {
    pub(super) log: MessageLog,
    pub(super) pending_input: String,
    pub(super) loading: bool,
    pub(super) dispatcher: QueryDispatcher,
    pub(super) greeting: String,
    pub(super) cmd_tx: mpsc::WeakUnboundedSender<Command>,
    pub(super) snapshot_tx: watch::Sender<Snapshot>,
}

impl ConversationState {
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::UpdateInput(text) => self.pending_input = text,
            Command::Submit => self.submit(),
            Command::Clear => self.clear(),
            Command::Settled(settlement) => self.settle(settlement),
            Command::Snapshot(reply_tx) => {
                reply_tx.send(self.snapshot()).ok();
            }
        }
        debug_assert_eq!(
            self.loading,
            self.dispatcher.stage() == DispatchStage::Submitting
        );
        self.publish();
    }

    fn submit(&mut self) {
        if self.loading {
            debug!("a query is outstanding, ignoring submit");
            return;
        }
        let text = self.pending_input.trim().to_owned();
        if text.is_empty() {
            debug!("input is blank, ignoring submit");
            return;
        }

        let Some(pending) = self.dispatcher.submit(&mut self.log, &text) else {
            return;
        };
        self.loading = true;
        self.pending_input.clear();

        // The task only holds a sender while the query is outstanding, so
        // dropping every handle still lets the conversation stop afterwards.
        let Some(cmd_tx) = self.cmd_tx.upgrade() else {
            debug!("no handle is left, nobody will see the reply");
            return;
        };
        tokio::spawn(async move {
            let settlement = pending.wait().await;
            cmd_tx.send(Command::Settled(settlement)).ok();
        });
    }

    fn clear(&mut self) {
        debug!("clearing the conversation");
        if self.loading {
            self.dispatcher.invalidate();
        }
        self.log.reset(self.greeting.as_str());
        self.pending_input.clear();
    }

    fn settle(&mut self, settlement: Settlement) {
        let outcome = self.dispatcher.settle(&mut self.log, settlement);
        debug!("query settled: {outcome:?}");
        self.loading = false;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            messages: self.log.messages().to_vec(),
            pending_input: self.pending_input.clone(),
            loading: self.loading,
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

pub async fn run(
    mut state: ConversationState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        state.handle(cmd);
    }
    debug!("will terminate");
}

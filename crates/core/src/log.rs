//! The ordered transcript.

use crate::message::{Message, MessageContent, MessageId, MessageKind, Sender};

/// The ordered sequence of messages making up a conversation.
///
/// Messages are kept in insertion order. The log only grows at the end,
/// shrinks through [`MessageLog::remove_where`], or starts over through
/// [`MessageLog::reset`]; there is no positional editing.
///
/// The log owns id assignment: every appended message gets an id greater
/// than all ids handed out before, including those from before a reset.
/// The typing placeholder always uses [`MessageId::TYPING`] and does not
/// consume an id.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    items: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    /// Creates a log holding only the greeting.
    pub fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        let mut log = Self::default();
        log.append(Sender::Assistant, MessageContent::Plain(greeting.into()));
        log
    }

    /// Appends a message and returns its id.
    ///
    /// Appending a typing placeholder replaces the existing one, if any,
    /// so the log never holds more than one.
    pub fn append(
        &mut self,
        sender: Sender,
        content: MessageContent,
    ) -> MessageId {
        let id = if content.kind() == MessageKind::Typing {
            self.remove_where(|m| m.kind() == MessageKind::Typing);
            MessageId::TYPING
        } else {
            let id = MessageId::new(self.next_id);
            self.next_id += 1;
            id
        };
        trace!("appending {:?} message {id:?}", content.kind());
        self.items.push(Message {
            id,
            sender,
            content,
        });
        id
    }

    /// Removes every message matching the predicate, keeping the relative
    /// order of the others. Returns how many were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Message) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|m| !predicate(m));
        before - self.items.len()
    }

    /// Drops everything and starts over with the given greeting.
    pub fn reset<S: Into<String>>(&mut self, greeting: S) {
        self.items.clear();
        self.append(Sender::Assistant, MessageContent::Plain(greeting.into()));
    }

    /// Returns the messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.items
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no messages, which only happens for a
    /// log created through `Default`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the typing placeholder is in the log.
    #[inline]
    pub fn has_typing(&self) -> bool {
        self.items.iter().any(|m| m.kind() == MessageKind::Typing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> MessageContent {
        MessageContent::Plain(text.to_owned())
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut log = MessageLog::with_greeting("Hi");
        let a = log.append(Sender::User, plain("a"));
        let typing = log.append(Sender::Assistant, MessageContent::Typing);
        log.remove_where(|m| m.kind() == MessageKind::Typing);
        let b = log.append(Sender::Assistant, plain("b"));

        assert_eq!(typing, MessageId::TYPING);
        assert!(log.messages()[0].id() < a);
        assert!(a < b);
        assert_eq!(b.get(), a.get() + 1);
    }

    #[test]
    fn test_reset_does_not_reuse_ids() {
        let mut log = MessageLog::with_greeting("Hi");
        let last = log.append(Sender::User, plain("a"));
        log.reset("Hi again");

        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].text(), "Hi again");
        assert!(log.messages()[0].id() > last);
    }

    #[test]
    fn test_single_typing_placeholder() {
        let mut log = MessageLog::with_greeting("Hi");
        log.append(Sender::Assistant, MessageContent::Typing);
        log.append(Sender::User, plain("a"));
        log.append(Sender::Assistant, MessageContent::Typing);

        let typing: Vec<_> = log
            .messages()
            .iter()
            .filter(|m| m.kind() == MessageKind::Typing)
            .collect();
        assert_eq!(typing.len(), 1);
        assert_eq!(log.messages().last().unwrap().kind(), MessageKind::Typing);
    }

    #[test]
    fn test_remove_where_keeps_order() {
        let mut log = MessageLog::with_greeting("Hi");
        log.append(Sender::User, plain("a"));
        log.append(Sender::Assistant, MessageContent::Typing);
        log.append(Sender::User, plain("b"));

        let removed = log.remove_where(|m| m.kind() == MessageKind::Typing);
        assert_eq!(removed, 1);
        assert!(!log.has_typing());

        let texts: Vec<_> = log.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, ["Hi", "a", "b"]);
    }
}

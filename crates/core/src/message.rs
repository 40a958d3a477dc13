//! Transcript entries.

use std::borrow::Cow;

use crate::formatter::Segment;

/// Identifier of a message, unique within the lifetime of a
/// [`MessageLog`](crate::log::MessageLog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// The id reserved for the typing placeholder. Real ids never reach it.
    pub const TYPING: MessageId = MessageId(u64::MAX);

    #[inline]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Who a message is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person describing symptoms.
    User,
    /// The conversation itself, relaying the query service.
    Assistant,
}

/// The kind of a message, which drives how it is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Ordinary text.
    Plain,
    /// A formatted list of candidate conditions.
    Conditions,
    /// A user-facing failure notice.
    Error,
    /// The transient placeholder shown while a query is outstanding.
    Typing,
}

/// What a message carries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageContent {
    /// Ordinary text.
    Plain(String),
    /// Segments produced by [`format_conditions`](crate::format_conditions).
    Conditions(Vec<Segment>),
    /// A user-facing failure notice.
    Error(String),
    /// The typing placeholder, which has no text of its own.
    Typing,
}

impl MessageContent {
    /// Returns the kind of this content.
    #[inline]
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageContent::Plain(_) => MessageKind::Plain,
            MessageContent::Conditions(_) => MessageKind::Conditions,
            MessageContent::Error(_) => MessageKind::Error,
            MessageContent::Typing => MessageKind::Typing,
        }
    }
}

/// One entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    pub(crate) id: MessageId,
    pub(crate) sender: Sender,
    pub(crate) content: MessageContent,
}

impl Message {
    /// Returns the id, [`MessageId::TYPING`] for the placeholder.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns who the message is attributed to.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the kind of the message.
    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.content.kind()
    }

    /// Returns what the message carries.
    #[inline]
    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the literal text of this message.
    ///
    /// Condition lists are rendered one segment per line. The typing
    /// placeholder has an empty text.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.content {
            MessageContent::Plain(text) | MessageContent::Error(text) => {
                Cow::Borrowed(text.as_str())
            }
            MessageContent::Conditions(segments) => Cow::Owned(
                segments
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            MessageContent::Typing => Cow::Borrowed(""),
        }
    }
}

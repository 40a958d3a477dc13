use owo_colors::OwoColorize;
use symptom_chat_core::Segment;
use symptom_chat_core::message::{Message, MessageContent, MessageId, Sender};

const BAR_CHAR: &str = "▎";

/// Renders a message for the terminal, or `None` for the typing
/// placeholder, which is shown as a spinner instead.
///
/// With `colored` unset the output is plain text.
pub fn render_message(message: &Message, colored: bool) -> Option<String> {
    let paint = |text: &str, color: fn(&str) -> String| {
        if colored { color(text) } else { text.to_owned() }
    };

    let rendered = match (message.sender(), message.content()) {
        (_, MessageContent::Typing) => return None,
        (Sender::User, content) => {
            let text = match content {
                MessageContent::Plain(text) | MessageContent::Error(text) => {
                    text.as_str()
                }
                _ => "",
            };
            format!(
                "{}🧑 {}",
                paint(BAR_CHAR, |s| s.bright_green().to_string()),
                paint(text, |s| s.bright_white().to_string())
            )
        }
        (Sender::Assistant, MessageContent::Plain(text)) => format!(
            "{}🩺 {}",
            paint(BAR_CHAR, |s| s.bright_cyan().to_string()),
            paint(text, |s| s.bright_white().to_string())
        ),
        (Sender::Assistant, MessageContent::Error(text)) => format!(
            "{}⚠️  {}",
            paint(BAR_CHAR, |s| s.bright_red().to_string()),
            paint(text, |s| s.red().to_string())
        ),
        (Sender::Assistant, MessageContent::Conditions(segments)) => {
            let bar = paint(BAR_CHAR, |s| s.bright_cyan().to_string());
            segments
                .iter()
                .map(|segment| match segment {
                    Segment::Title => format!(
                        "{bar}📋 {}",
                        paint(&segment.to_string(), |s| s.bold().to_string())
                    ),
                    Segment::Entry(_) => format!("{bar}   {segment}"),
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    };
    Some(rendered)
}

/// Keeps track of which messages of a transcript have been printed.
///
/// Message ids only ever grow, even across a clear, so every message with
/// an id above the last printed one is new. The typing placeholder is
/// never reported.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    last_printed: Option<MessageId>,
}

impl TranscriptPrinter {
    /// Returns the messages that have not been printed yet, and marks them
    /// as printed.
    pub fn take_new<'a>(&mut self, messages: &'a [Message]) -> Vec<&'a Message> {
        let new: Vec<_> = messages
            .iter()
            .filter(|m| m.id() != MessageId::TYPING)
            .filter(|m| self.last_printed.is_none_or(|last| m.id() > last))
            .collect();
        if let Some(last) = new.last() {
            self.last_printed = Some(last.id());
        }
        new
    }
}

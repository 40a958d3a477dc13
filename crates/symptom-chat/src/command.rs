use symptom_chat_core::{ControllerClosedError, ConversationController};

/// A line entered at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Describe symptoms and submit them.
    Submit(String),
    /// Submit whatever is pending, typically a selected suggestion.
    SubmitPending,
    /// Start the conversation over.
    Clear,
    /// Show the example phrases.
    ListSuggestions,
    /// Put the n-th example phrase (1-based) into the input.
    UseSuggestion(usize),
    /// Show the available commands.
    Help,
    /// Leave.
    Quit,
    /// Something starting with `/` that is not a command.
    Unknown(String),
}

impl Command {
    /// Passes the command on to the conversation.
    ///
    /// Commands that only concern the terminal are ignored, as is a
    /// suggestion number the conversation does not offer. Works the same
    /// while a query is outstanding: the input can still be edited and the
    /// conversation cleared, only submitting waits for the answer.
    pub fn send_to(
        &self,
        controller: &ConversationController,
    ) -> Result<(), ControllerClosedError> {
        match self {
            Command::Submit(text) => {
                controller.update_input(text.as_str())?;
                controller.submit()
            }
            Command::SubmitPending => controller.submit(),
            Command::Clear => controller.clear(),
            Command::UseSuggestion(n) => {
                match controller.suggestions().get(n - 1) {
                    Some(suggestion) => {
                        controller.select_suggestion(suggestion.as_str())
                    }
                    None => Ok(()),
                }
            }
            Command::ListSuggestions
            | Command::Help
            | Command::Quit
            | Command::Unknown(_) => Ok(()),
        }
    }
}

/// Parses a line entered at the prompt.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::SubmitPending;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Submit(line.to_owned());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("clear"), None, _) => Command::Clear,
        (Some("suggestions"), None, _) => Command::ListSuggestions,
        (Some("use"), Some(n), None) => match n.parse() {
            Ok(n) if n > 0 => Command::UseSuggestion(n),
            _ => Command::Unknown(trimmed.to_owned()),
        },
        (Some("help"), None, _) => Command::Help,
        (Some("quit" | "exit"), None, _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_owned()),
    }
}

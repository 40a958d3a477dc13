use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, Lines};

/// Reads the prompt line by line.
///
/// Keep one reader for the whole session: lines that arrived together, as
/// they do when input is piped, are buffered here until they are asked for.
pub struct PromptReader<R> {
    lines: Lines<R>,
}

impl PromptReader<io::BufReader<io::Stdin>> {
    /// Reads from the standard input.
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> PromptReader<R> {
    /// Reads from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Returns the next line without its line ending, or `None` once the
    /// input is exhausted or cannot be read.
    ///
    /// Cancel safe, so it can be raced against other events in `select!`.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(err) => {
                error!("error reading input: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_read_together_are_all_returned() {
        let mut reader =
            PromptReader::new(&b"/suggestions\n/help\n/quit\n"[..]);

        assert_eq!(reader.next_line().await.as_deref(), Some("/suggestions"));
        assert_eq!(reader.next_line().await.as_deref(), Some("/help"));
        assert_eq!(reader.next_line().await.as_deref(), Some("/quit"));
        assert_eq!(reader.next_line().await, None);
    }

    #[tokio::test]
    async fn test_line_endings_are_stripped() {
        let mut reader = PromptReader::new(&b"fever\r\n\nno newline"[..]);

        assert_eq!(reader.next_line().await.as_deref(), Some("fever"));
        assert_eq!(reader.next_line().await.as_deref(), Some(""));
        assert_eq!(reader.next_line().await.as_deref(), Some("no newline"));
        assert_eq!(reader.next_line().await, None);
    }
}

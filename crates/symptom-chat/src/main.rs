//! A terminal chat that asks the symptom API about what the user describes.

#[macro_use]
extern crate tracing;

use std::env;
use std::fmt::Display;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use symptom_chat::core::{
    ControllerClosedError, ConversationBuilder, ConversationController,
    Snapshot,
};
use symptom_chat::{
    Command, PromptReader, TranscriptPrinter, parse_command, render_message,
};
use symptom_chat_http_service::{HttpQueryService, HttpServiceConfigBuilder};
use tokio::select;

const HELP: &str = "\
Describe your symptoms and press Enter. Commands:
  /suggestions   list example descriptions
  /use N         put example N into the input, press Enter to send it
  /clear         start the conversation over
  /quit          leave";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = match env::var("SYMPTOM_API_BASE_URL") {
        Ok(base_url) => HttpServiceConfigBuilder::with_base_url(base_url),
        Err(_) => HttpServiceConfigBuilder::default(),
    };
    if let Ok(secs) = env::var("SYMPTOM_API_TIMEOUT_SECS") {
        match secs.parse() {
            Ok(secs) => config = config.with_timeout(Duration::from_secs(secs)),
            Err(err) => {
                eprintln!("SYMPTOM_API_TIMEOUT_SECS is not a number: {err}");
                return;
            }
        }
    }
    let config = config.build();
    info!("using symptom API at {}", config.base_url());

    let service = match HttpQueryService::new(config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to set up the HTTP client: {err}");
            return;
        }
    };
    match service.health().await {
        Ok(true) => {}
        Ok(false) => {
            warn!("symptom API reports it is not healthy");
            println!("{}", "The symptom service reports a problem.".yellow());
        }
        Err(err) => {
            warn!("health check failed: {err}");
            println!("{}", "The symptom service is not reachable yet.".yellow());
        }
    }

    let controller = ConversationBuilder::with_query_service(service).build();
    let mut snapshots = controller.subscribe();
    let mut input = PromptReader::stdin();
    let mut screen = Screen::default();

    let greeting = snapshots.borrow_and_update().clone();
    screen.show(&greeting);
    screen.println(format_args!("{HELP}\n"));

    loop {
        if !snapshots.borrow().loading {
            screen.prompt();
        }

        select! {
            line = input.next_line() => {
                let Some(line) = line else {
                    break;
                };
                screen.prompted = false;
                match run_command(&controller, &mut screen, parse_command(&line))
                {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(_) => {
                        error!("conversation stopped unexpectedly");
                        break;
                    }
                }

                // Everything sent above is reflected in the snapshots now.
                if controller.snapshot().await.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                screen.show(&snapshot);
                if snapshot.loading && !snapshot.pending_input.is_empty() {
                    screen.println(
                        "Still waiting for the last answer. Press Enter once \
                         it arrives to send this."
                            .dimmed(),
                    );
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                screen.show(&snapshot);
            }
        }
    }
}

/// Runs a command entered at the prompt. Returns `Ok(false)` to leave.
fn run_command(
    controller: &ConversationController,
    screen: &mut Screen,
    command: Command,
) -> Result<bool, ControllerClosedError> {
    match &command {
        Command::Quit => return Ok(false),
        Command::Help => screen.println(HELP),
        Command::ListSuggestions => {
            for (idx, suggestion) in controller.suggestions().iter().enumerate()
            {
                screen.println(format_args!("  {}. {suggestion}", idx + 1));
            }
        }
        Command::UseSuggestion(n) => match controller.suggestions().get(n - 1) {
            Some(suggestion) => screen.println(format_args!(
                "Input set to {}",
                suggestion.bright_white()
            )),
            None => screen.println(format_args!("There is no example {n}.")),
        },
        Command::Clear => screen.println("Conversation cleared.".dimmed()),
        Command::Unknown(cmd) => {
            screen.println(format_args!("Unknown command {cmd}, try /help."));
        }
        Command::Submit(_) | Command::SubmitPending => {}
    }
    command.send_to(controller)?;
    Ok(true)
}

/// The terminal as the user sees it: the transcript, a spinner while a query
/// is outstanding, and the prompt.
#[derive(Default)]
struct Screen {
    printer: TranscriptPrinter,
    progress_bar: Option<ProgressBar>,
    prompted: bool,
}

impl Screen {
    fn println(&mut self, line: impl Display) {
        self.prompted = false;
        // Keep the spinner out of the way of the new lines.
        match &self.progress_bar {
            Some(progress_bar) => progress_bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn show(&mut self, snapshot: &Snapshot) {
        let rendered: Vec<_> = self
            .printer
            .take_new(&snapshot.messages)
            .into_iter()
            .filter_map(|message| render_message(message, true))
            .collect();
        for line in rendered {
            self.println(line);
        }

        if !snapshot.loading {
            if let Some(progress_bar) = self.progress_bar.take() {
                progress_bar.finish_and_clear();
            }
            return;
        }
        if self.progress_bar.is_none() {
            let progress_bar = ProgressBar::new_spinner();
            progress_bar.set_style(
                ProgressStyle::with_template("{spinner} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            progress_bar.set_message("🩺 Typing...");
            progress_bar.enable_steady_tick(Duration::from_millis(100));
            self.progress_bar = Some(progress_bar);
        }
    }

    fn prompt(&mut self) {
        if self.prompted {
            return;
        }
        print!("> ");
        std::io::stdout().flush().ok();
        self.prompted = true;
    }
}

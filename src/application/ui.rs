use std::io::Write;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::ChatEvent;
use crate::domain::models::MessageType;
use crate::domain::services::ChatLogSnapshot;
use crate::domain::services::ChatService;

/// Tracks how much of the log has already been written to the terminal so
/// snapshots can be rendered incrementally, delta by delta.
#[derive(Default)]
struct RenderCursor {
    messages: usize,
    trailing_bytes: usize,
    open: bool,
}

fn render(snapshot: &ChatLogSnapshot, cursor: &mut RenderCursor) -> Result<()> {
    let mut stdout = std::io::stdout();

    for idx in cursor.messages..snapshot.messages.len() {
        let message = &snapshot.messages[idx];

        if !cursor.open {
            if message.author == Author::User {
                // The terminal already echoed the user's line.
                cursor.messages = idx + 1;
                continue;
            }

            let label = message.author.to_string();
            if message.message_type() == MessageType::Error {
                write!(stdout, "{}: ", label.red())?;
                write!(stdout, "{}", message.text.red())?;
            } else {
                write!(stdout, "{}: ", label.bold())?;
                write!(stdout, "{}", message.text)?;
            }
            cursor.open = true;
            cursor.trailing_bytes = message.text.len();
        } else if message.text.len() >= cursor.trailing_bytes {
            write!(stdout, "{}", &message.text[cursor.trailing_bytes..])?;
            cursor.trailing_bytes = message.text.len();
        } else {
            // The partial answer was swapped out for a notice.
            writeln!(stdout)?;
            write!(stdout, "{}", message.text.red())?;
            cursor.trailing_bytes = message.text.len();
        }

        if message.is_in_progress() {
            break;
        }

        writeln!(stdout)?;
        cursor.open = false;
        cursor.trailing_bytes = 0;
        cursor.messages = idx + 1;
    }

    stdout.flush()?;

    return Ok(());
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(
        stdout,
        "{}: ",
        Config::get(ConfigKey::Username).bold()
    )?;
    stdout.flush()?;

    return Ok(());
}

pub async fn start(
    mut service: ChatService,
    mut event_rx: mpsc::UnboundedReceiver<ChatEvent>,
) -> Result<()> {
    let mut log_rx = service.subscribe();
    let mut cursor = RenderCursor::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&log_rx.borrow_and_update(), &mut cursor)?;
    prompt()?;
    let mut at_prompt = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(line) => {
                        if service.waiting_for_backend() {
                            let notice = "(answer in progress, press CTRL+C to cancel)";
                            println!("{}", notice.dimmed());
                            continue;
                        }

                        let trimmed = line.trim();
                        if trimmed == "/quit" || trimmed == "/q" || trimmed == "/exit" {
                            break;
                        }

                        service.start(&line);
                        if service.waiting_for_backend() {
                            at_prompt = false;
                        } else {
                            // Blank submission, nothing was sent.
                            prompt()?;
                        }
                    }
                }
            }
            event = event_rx.recv() => {
                if let Some(event) = event {
                    service.handle_event(event);
                }
            }
            _ = signal::ctrl_c() => {
                if service.waiting_for_backend() {
                    service.cancel();
                } else {
                    break;
                }
            }
        }

        if log_rx.has_changed()? {
            let snapshot = log_rx.borrow_and_update().clone();
            render(&snapshot, &mut cursor)?;

            if !snapshot.waiting_for_backend && !at_prompt {
                prompt()?;
                at_prompt = true;
            }
        }
    }

    println!();

    return Ok(());
}

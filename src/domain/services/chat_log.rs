#[cfg(test)]
#[path = "chat_log_test.rs"]
mod tests;

use tokio::sync::watch;

use crate::domain::models::Author;
use crate::domain::models::Message;

/// An immutable view of the conversation, republished after every change.
#[derive(Clone, Default)]
pub struct ChatLogSnapshot {
    pub messages: Vec<Message>,
    pub waiting_for_backend: bool,
}

/// Owns the ordered message log and the scratch text of the in-flight
/// assistant answer. Entries are append-only; only the trailing entry is
/// ever mutated, and only while it is in progress.
pub struct ChatLog {
    messages: Vec<Message>,
    accumulated_text: String,
    waiting_for_backend: bool,
    snapshot_tx: watch::Sender<ChatLogSnapshot>,
}

impl ChatLog {
    pub fn new() -> ChatLog {
        let (snapshot_tx, _) = watch::channel(ChatLogSnapshot::default());

        return ChatLog {
            messages: vec![],
            accumulated_text: "".to_string(),
            waiting_for_backend: false,
            snapshot_tx,
        };
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatLogSnapshot> {
        return self.snapshot_tx.subscribe();
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn waiting_for_backend(&self) -> bool {
        return self.waiting_for_backend;
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.publish();
    }

    /// Appends the assistant placeholder the stream will fill in. The
    /// placeholder is published before the request goes out, so subscribers
    /// show the pending answer with no network latency.
    pub fn begin_assistant_message(&mut self) {
        self.accumulated_text.clear();
        self.waiting_for_backend = true;
        self.messages.push(Message::new_in_progress(Author::Assistant));
        self.publish();
    }

    pub fn apply_delta(&mut self, text: &str) {
        self.accumulated_text += text;
        self.messages
            .last_mut()
            .unwrap()
            .set_text(&self.accumulated_text);
        self.publish();
    }

    pub fn finish(&mut self) {
        self.accumulated_text.clear();
        self.waiting_for_backend = false;
        self.messages.last_mut().unwrap().finish();
        self.publish();
    }

    /// Swaps whatever partial text accumulated for a user-facing notice and
    /// closes out the trailing message.
    pub fn fail(&mut self, user_message: &str) {
        self.accumulated_text.clear();
        self.waiting_for_backend = false;
        self.messages
            .last_mut()
            .unwrap()
            .replace_with_error(user_message);
        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(ChatLogSnapshot {
            messages: self.messages.clone(),
            waiting_for_backend: self.waiting_for_backend,
        });
    }
}

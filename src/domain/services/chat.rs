#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::ChatLog;
use super::ChatLogSnapshot;
use super::Sessions;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AnswerPrompt;
use crate::domain::models::Author;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatEvent;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::infrastructure::backends::BackendManager;

/// What the user sees when a stream dies, whatever the cause. The real cause
/// only goes to the debug log.
const FAILURE_NOTICE: &str = "Sorry, I encountered an error. Please try again.";
const CANCELLED_NOTICE: &str = "Answer cancelled.";
const GREETING: &str =
    "Hello! I can tell you about experience, skills, and projects. What would you like to know?";

/// Drives one answer stream at a time: appends the user's question and the
/// assistant placeholder, spawns a transport worker, and folds the worker's
/// events back into the chat log. Exposes the start/cancel/subscribe surface
/// the front end binds to.
pub struct ChatService {
    backend: Arc<BackendBox>,
    log: ChatLog,
    session_id: String,
    next_turn: u64,
    active_turn: Option<u64>,
    worker: JoinHandle<Result<()>>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
}

impl ChatService {
    pub async fn new(event_tx: mpsc::UnboundedSender<ChatEvent>) -> Result<ChatService> {
        let backend = BackendManager::get(&Config::get(ConfigKey::Backend))?;
        let mut service = ChatService::with_backend(backend, event_tx);

        if let Err(err) = service.backend.health_check().await {
            service.log.add_message(Message::new_with_type(
                Author::Assistant,
                MessageType::Error,
                &format!("Hey, it looks like I can't reach the assistant service right now. Answers will fail until it is back.\n\nError: {err}"),
            ));
        }

        return Ok(service);
    }

    pub fn with_backend(
        backend: BackendBox,
        event_tx: mpsc::UnboundedSender<ChatEvent>,
    ) -> ChatService {
        let mut log = ChatLog::new();
        log.add_message(Message::new(Author::Assistant, GREETING));

        return ChatService {
            backend: Arc::new(backend),
            log,
            session_id: Sessions::create_id(),
            next_turn: 0,
            active_turn: None,
            // Lazy default.
            worker: tokio::spawn(async {
                return Ok(());
            }),
            event_tx,
        };
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatLogSnapshot> {
        return self.log.subscribe();
    }

    pub fn waiting_for_backend(&self) -> bool {
        return self.log.waiting_for_backend();
    }

    /// Submits one user question. Whitespace-only input and submissions made
    /// while an answer is already streaming are ignored.
    pub fn start(&mut self, text: &str) {
        let question = text.trim();
        if question.is_empty() || self.active_turn.is_some() {
            return;
        }

        self.next_turn += 1;
        let turn = self.next_turn;
        self.active_turn = Some(turn);

        // Both entries land in the log before the request goes out.
        self.log.add_message(Message::new(Author::User, question));
        self.log.begin_assistant_message();

        let prompt = AnswerPrompt::new(question, &self.session_id, turn);
        let backend = self.backend.clone();
        let worker_tx = self.event_tx.clone();

        self.worker = tokio::spawn(async move {
            if let Err(err) = backend.get_answer(prompt, &worker_tx).await {
                tracing::error!(error = ?err, turn = turn, "answer stream failed");
                worker_tx.send(ChatEvent::StreamFailed {
                    turn,
                    cause: format!("{err:?}"),
                })?;
            }

            return Ok(());
        });
    }

    /// Aborts the in-flight request. Events the worker already queued are
    /// dropped when they arrive, so no delta lands after this returns.
    pub fn cancel(&mut self) {
        if self.active_turn.take().is_none() {
            return;
        }

        self.worker.abort();
        self.log.fail(CANCELLED_NOTICE);
    }

    /// Applies one worker event on the driving task. Events tagged with any
    /// turn other than the active one come from a stream that was cancelled
    /// or already finished, and are dropped.
    pub fn handle_event(&mut self, event: ChatEvent) {
        if self.active_turn != Some(event.turn()) {
            return;
        }

        match event {
            ChatEvent::StreamDelta { text, .. } => {
                self.log.apply_delta(&text);
            }
            ChatEvent::StreamDone { .. } => {
                self.active_turn = None;
                self.log.finish();
            }
            ChatEvent::StreamFailed { .. } => {
                self.active_turn = None;
                self.log.fail(FAILURE_NOTICE);
            }
        }
    }
}

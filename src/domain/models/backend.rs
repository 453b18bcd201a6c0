use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ChatEvent;

pub type BackendBox = Box<dyn Backend + Send + Sync>;

/// One question bound for the answer service, alongside the session it
/// belongs to and the turn its events will be tagged with.
pub struct AnswerPrompt {
    pub question: String,
    pub session_id: String,
    pub turn: u64,
}

impl AnswerPrompt {
    pub fn new(question: &str, session_id: &str, turn: u64) -> AnswerPrompt {
        return AnswerPrompt {
            question: question.to_string(),
            session_id: session_id.to_string(),
            turn,
        };
    }
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the answer service is reachable.
    async fn health_check(&self) -> Result<()>;

    /// Streams the answer for a prompt. Each content delta is passed through
    /// the channel as it is decoded, followed by a final done event. A
    /// transport fault, a malformed frame, or an upstream error frame aborts
    /// the stream and is surfaced to the caller instead.
    async fn get_answer<'a>(
        &self,
        prompt: AnswerPrompt,
        tx: &'a mpsc::UnboundedSender<ChatEvent>,
    ) -> Result<()>;
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

/// The semantic outcome of one decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Content(String),
    Done,
    Error(String),
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FramePayload {
    error: Option<String>,
    done: Option<bool>,
    content: Option<String>,
}

impl StreamEvent {
    /// Maps one raw frame payload to its semantic event. `error` overrides
    /// `done`, and `done` overrides `content`. A frame carrying none of the
    /// three keys is a heartbeat and produces no event. A payload that does
    /// not parse means the stream is desynced, which fails the session.
    pub fn interpret(raw: &str) -> Result<Option<StreamEvent>> {
        let payload: FramePayload = match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(err) => bail!("malformed frame {raw:?}: {err}"),
        };

        if let Some(message) = payload.error {
            return Ok(Some(StreamEvent::Error(message)));
        }

        if payload.done.unwrap_or(false) {
            return Ok(Some(StreamEvent::Done));
        }

        if let Some(content) = payload.content {
            if !content.is_empty() {
                return Ok(Some(StreamEvent::Content(content)));
            }
        }

        return Ok(None);
    }
}

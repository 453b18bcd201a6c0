#[cfg(test)]
#[path = "portfolio_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;

use super::frames::FrameDecoder;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AnswerPrompt;
use crate::domain::models::Backend;
use crate::domain::models::ChatEvent;
use crate::domain::models::StreamEvent;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AnswerRequest {
    question: String,
    session_id: String,
}

pub struct Portfolio {
    url: String,
    timeout: String,
}

impl Default for Portfolio {
    fn default() -> Portfolio {
        return Portfolio {
            url: Config::get(ConfigKey::BaseURL),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

#[async_trait]
impl Backend for Portfolio {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Assistant service URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(&self.url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "Assistant service is not reachable");
            bail!("Assistant service is not reachable");
        }

        // The service root is not part of the wire contract, so any answer,
        // a 404 included, proves reachability. Server faults do not.
        let status = res.unwrap().status().as_u16();
        if status >= 500 {
            tracing::error!(status = status, "Assistant service health check failed");
            bail!("Assistant service health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_answer<'a>(
        &self,
        prompt: AnswerPrompt,
        tx: &'a mpsc::UnboundedSender<ChatEvent>,
    ) -> Result<()> {
        let turn = prompt.turn;
        let req = AnswerRequest {
            question: prompt.question,
            session_id: prompt.session_id,
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/api/chat/stream/", url = self.url))
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make answer request to the assistant service"
            );
            bail!("Failed to make answer request to the assistant service");
        }

        let mut stream = res.bytes_stream();
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for raw in decoder.feed(&chunk)? {
                tracing::debug!(frame = raw.as_str(), "decoded frame");

                match StreamEvent::interpret(&raw)? {
                    Some(StreamEvent::Content(text)) => {
                        tx.send(ChatEvent::StreamDelta { turn, text })?;
                    }
                    Some(StreamEvent::Done) => {
                        tx.send(ChatEvent::StreamDone { turn })?;
                        return Ok(());
                    }
                    Some(StreamEvent::Error(message)) => {
                        bail!(format!("The assistant service failed mid-answer: {message}"));
                    }
                    None => {}
                }
            }
        }

        if decoder.pending() {
            tracing::warn!("stream closed with an unterminated frame in the buffer");
        }

        // The transport closing without a done frame counts as completion.
        tx.send(ChatEvent::StreamDone { turn })?;

        return Ok(());
    }
}

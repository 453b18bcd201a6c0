use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::Portfolio;
use crate::domain::models::AnswerPrompt;
use crate::domain::models::Backend;
use crate::domain::models::ChatEvent;

impl Portfolio {
    fn with_url(url: String) -> Portfolio {
        return Portfolio {
            url,
            timeout: "1000".to_string(),
        };
    }
}

fn to_delta(event: Option<ChatEvent>) -> Result<(u64, String)> {
    match event.unwrap() {
        ChatEvent::StreamDelta { turn, text } => return Ok((turn, text)),
        _ => bail!("Wrong event type from recv"),
    }
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(200).create();

    let backend = Portfolio::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_health_checks_despite_a_missing_index() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(404).create();

    let backend = Portfolio::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks_on_server_faults() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(500).create();

    let backend = Portfolio::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_streams_answers() -> Result<()> {
    let body =
        "data: {\"content\":\"I know \"}\n\ndata: {\"content\":\"Go and Rust.\"}\n\ndata: {\"done\":true}\n\n";

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat/stream/")
        .match_header("Content-Type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "question": "What languages do you know?",
            "session_id": "abc",
        })))
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    backend
        .get_answer(
            AnswerPrompt::new("What languages do you know?", "abc", 1),
            &tx,
        )
        .await?;

    mock.assert();

    let (first_turn, first_text) = to_delta(rx.recv().await)?;
    assert_eq!(first_turn, 1);
    assert_eq!(first_text, "I know ");

    let (_, second_text) = to_delta(rx.recv().await)?;
    assert_eq!(second_text, "Go and Rust.");

    match rx.recv().await.unwrap() {
        ChatEvent::StreamDone { turn } => assert_eq!(turn, 1),
        _ => bail!("Wrong event type from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_ignores_heartbeat_frames() -> Result<()> {
    let body = "data: {}\n\ndata: {\"content\":\"Hi\"}\n\ndata: {\"done\":true}\n\n";

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat/stream/")
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    backend
        .get_answer(AnswerPrompt::new("Hello", "abc", 4), &tx)
        .await?;

    mock.assert();

    let (_, text) = to_delta(rx.recv().await)?;
    assert_eq!(text, "Hi");

    match rx.recv().await.unwrap() {
        ChatEvent::StreamDone { turn } => assert_eq!(turn, 4),
        _ => bail!("Wrong event type from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_completes_on_stream_close_without_a_done_frame() -> Result<()> {
    let body = "data: {\"content\":\"Hi\"}\n\n";

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat/stream/")
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    backend
        .get_answer(AnswerPrompt::new("Hello", "abc", 2), &tx)
        .await?;

    mock.assert();

    let (_, text) = to_delta(rx.recv().await)?;
    assert_eq!(text, "Hi");

    match rx.recv().await.unwrap() {
        ChatEvent::StreamDone { turn } => assert_eq!(turn, 2),
        _ => bail!("Wrong event type from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_error_frames() {
    let body = "data: {\"content\":\"Partial\"}\n\ndata: {\"error\":\"model exploded\"}\n\n";

    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat/stream/")
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    let res = backend
        .get_answer(AnswerPrompt::new("Hello", "abc", 3), &tx)
        .await;

    assert!(res.is_err());
    assert!(res.unwrap_err().to_string().contains("model exploded"));

    // The delta before the error frame was already forwarded. No done event
    // follows it.
    let (_, text) = to_delta(rx.recv().await).unwrap();
    assert_eq!(text, "Partial");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn it_fails_on_malformed_frames() {
    let body = "data: not json\n\n";

    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat/stream/")
        .with_status(200)
        .with_body(body)
        .create();

    let (tx, _rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    let res = backend
        .get_answer(AnswerPrompt::new("Hello", "abc", 1), &tx)
        .await;

    assert!(res.is_err());
}

#[tokio::test]
async fn it_fails_on_non_success_statuses() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat/stream/")
        .with_status(502)
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    let backend = Portfolio::with_url(server.url());
    let res = backend
        .get_answer(AnswerPrompt::new("Hello", "abc", 1), &tx)
        .await;

    assert!(res.is_err());
    assert!(rx.try_recv().is_err());
    mock.assert();
}

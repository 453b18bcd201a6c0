use anyhow::Result;

use super::StreamEvent;

#[test]
fn it_interprets_content() -> Result<()> {
    let event = StreamEvent::interpret("{\"content\":\"Hello\"}")?;
    assert_eq!(event, Some(StreamEvent::Content("Hello".to_string())));

    return Ok(());
}

#[test]
fn it_interprets_done() -> Result<()> {
    let event = StreamEvent::interpret("{\"done\":true}")?;
    assert_eq!(event, Some(StreamEvent::Done));

    return Ok(());
}

#[test]
fn it_interprets_errors() -> Result<()> {
    let event = StreamEvent::interpret("{\"error\":\"model exploded\"}")?;
    assert_eq!(event, Some(StreamEvent::Error("model exploded".to_string())));

    return Ok(());
}

#[test]
fn it_prefers_errors_over_every_other_field() -> Result<()> {
    let event = StreamEvent::interpret("{\"error\":\"boom\",\"done\":true,\"content\":\"Hi\"}")?;
    assert_eq!(event, Some(StreamEvent::Error("boom".to_string())));

    return Ok(());
}

#[test]
fn it_prefers_done_over_content() -> Result<()> {
    let event = StreamEvent::interpret("{\"done\":true,\"content\":\"Hi\"}")?;
    assert_eq!(event, Some(StreamEvent::Done));

    return Ok(());
}

#[test]
fn it_ignores_false_done_markers() -> Result<()> {
    let event = StreamEvent::interpret("{\"done\":false,\"content\":\"Hi\"}")?;
    assert_eq!(event, Some(StreamEvent::Content("Hi".to_string())));

    return Ok(());
}

#[test]
fn it_treats_empty_frames_as_heartbeats() -> Result<()> {
    assert_eq!(StreamEvent::interpret("{}")?, None);
    assert_eq!(StreamEvent::interpret("{\"content\":\"\"}")?, None);

    return Ok(());
}

#[test]
fn it_tolerates_unknown_fields() -> Result<()> {
    let event = StreamEvent::interpret("{\"content\":\"Hi\",\"model\":\"portfolio-v2\"}")?;
    assert_eq!(event, Some(StreamEvent::Content("Hi".to_string())));

    return Ok(());
}

#[test]
fn it_fails_on_unparseable_payloads() {
    assert!(StreamEvent::interpret("not json").is_err());
    assert!(StreamEvent::interpret("").is_err());
}

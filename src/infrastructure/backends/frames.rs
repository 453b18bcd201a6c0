#[cfg(test)]
#[path = "frames_test.rs"]
mod tests;

use std::str;

use anyhow::bail;
use anyhow::Result;

/// Marker a candidate frame must carry to be recognized.
const FRAME_MARKER: &str = "data: ";
/// Two newlines terminate a frame.
const FRAME_DELIMITER: &str = "\n\n";

/// Reassembles the raw payloads of a framed byte stream. Transport chunks
/// may end in the middle of a multi-byte UTF-8 character or in the middle of
/// a frame, so both an undecoded byte tail and an undelimited text tail are
/// carried between calls to `feed`.
#[derive(Default)]
pub struct FrameDecoder {
    bytes: Vec<u8>,
    text: String,
}

impl FrameDecoder {
    pub fn new() -> FrameDecoder {
        return FrameDecoder::default();
    }

    /// Feeds one transport chunk and returns the payload of every frame the
    /// chunk completed. Frames without the `data: ` marker are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.bytes.extend_from_slice(chunk);

        let decoded = match str::from_utf8(&self.bytes) {
            Ok(valid) => {
                let text = valid.to_string();
                self.bytes.clear();
                text
            }
            Err(err) => {
                if err.error_len().is_some() {
                    bail!(
                        "invalid UTF-8 in stream at byte {offset}",
                        offset = err.valid_up_to()
                    );
                }

                // The chunk ends inside a multi-byte character. Decode the
                // valid prefix and keep the tail for the next chunk.
                let valid = err.valid_up_to();
                let text = str::from_utf8(&self.bytes[..valid]).unwrap().to_string();
                self.bytes.drain(..valid);
                text
            }
        };

        self.text.push_str(&decoded);

        let mut frames: Vec<String> = vec![];
        while let Some(idx) = self.text.find(FRAME_DELIMITER) {
            let frame = self.text[..idx].to_string();
            self.text = self.text[idx + FRAME_DELIMITER.len()..].to_string();

            if let Some(payload) = frame.strip_prefix(FRAME_MARKER) {
                frames.push(payload.to_string());
            }
        }

        return Ok(frames);
    }

    /// Whether buffered data is still waiting for the rest of its frame.
    pub fn pending(&self) -> bool {
        return !self.bytes.is_empty() || !self.text.is_empty();
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Normal,
    Error,
}

/// One entry in the conversation log. Only the trailing entry may still be
/// in progress, and only while its answer is streaming in.
#[derive(Clone, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub text: String,
    mtype: MessageType,
    in_progress: bool,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            mtype: MessageType::Normal,
            in_progress: false,
        };
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            mtype,
            in_progress: false,
        };
    }

    /// An empty placeholder that deltas will fill in as they arrive.
    pub fn new_in_progress(author: Author) -> Message {
        return Message {
            author,
            text: "".to_string(),
            mtype: MessageType::Normal,
            in_progress: true,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn is_in_progress(&self) -> bool {
        return self.in_progress;
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.replace('\t', "  ");
    }

    pub fn finish(&mut self) {
        self.in_progress = false;
    }

    /// Swaps the message body for a user-facing notice and closes it out.
    pub fn replace_with_error(&mut self, text: &str) {
        self.text = text.to_string();
        self.mtype = MessageType::Error;
        self.in_progress = false;
    }
}

mod chat;
mod chat_log;
mod sessions;

pub use chat::*;
pub use chat_log::*;
pub use sessions::*;

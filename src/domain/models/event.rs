/// Events a transport worker emits while streaming one answer. Every event
/// carries the turn that spawned the worker so the controller can drop
/// leftovers from aborted or completed streams.
pub enum ChatEvent {
    StreamDelta { turn: u64, text: String },
    StreamDone { turn: u64 },
    StreamFailed { turn: u64, cause: String },
}

impl ChatEvent {
    pub fn turn(&self) -> u64 {
        match self {
            ChatEvent::StreamDelta { turn, .. } => return *turn,
            ChatEvent::StreamDone { turn } => return *turn,
            ChatEvent::StreamFailed { turn, .. } => return *turn,
        }
    }
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use uuid::Uuid;

pub struct Sessions {}

impl Sessions {
    /// Identifies one conversation to the answer service. Generated once per
    /// service instance and sent unchanged on every request in that session.
    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }
}

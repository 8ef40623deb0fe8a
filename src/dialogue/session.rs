use serde::Serialize;
use uuid::Uuid;

/// Identifies one conversation in the logs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span that every event of one `process` call is recorded under
pub fn session_span(session_id: SessionId, state: &'static str) -> tracing::Span {
    tracing::info_span!(
        "dialogue_turn",
        session_id = %session_id,
        state = state,
    )
}

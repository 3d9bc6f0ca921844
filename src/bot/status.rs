// src/bot/status.rs
//! Explicit session status record for the messaging transport, rendered by
//! the web handlers. Replaces ad hoc process-wide mutable state.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Starting,
    AwaitingScan { qr: String },
    Authenticated,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub state: SessionState,
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionStatus {
    pub fn new() -> Self {
        Self {
            state: SessionState::Starting,
            last_error: None,
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Transport produced a fresh pairing code.
    pub fn qr_received(&mut self, qr: String) {
        self.state = SessionState::AwaitingScan { qr };
        self.touch();
    }

    /// Scan accepted; the pairing code is no longer valid.
    pub fn authenticated(&mut self) {
        self.state = SessionState::Authenticated;
        self.last_error = None;
        self.touch();
    }

    pub fn ready(&mut self) {
        self.state = SessionState::Ready;
        self.touch();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.touch();
    }

    pub fn qr(&self) -> Option<&str> {
        match &self.state {
            SessionState::AwaitingScan { qr } => Some(qr),
            _ => None,
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_starting_state() {
        let status = SessionStatus::new();
        assert_eq!(status.state, SessionState::Starting);
        assert_eq!(status.last_error, None);
        assert_eq!(status.qr(), None);
    }

    #[test]
    fn test_qr_then_authenticated_clears_code() {
        let mut status = SessionStatus::new();
        status.qr_received("2@abc123".to_string());
        assert_eq!(status.qr(), Some("2@abc123"));

        status.authenticated();
        assert_eq!(status.state, SessionState::Authenticated);
        assert_eq!(status.qr(), None);
    }

    #[test]
    fn test_failure_keeps_state_but_records_error() {
        let mut status = SessionStatus::new();
        status.qr_received("2@abc123".to_string());
        status.fail("Authentication Failure: bad session");

        assert_eq!(status.qr(), Some("2@abc123"));
        assert_eq!(
            status.last_error.as_deref(),
            Some("Authentication Failure: bad session")
        );

        // A later successful auth wipes the recorded error.
        status.authenticated();
        assert_eq!(status.last_error, None);
    }

    #[test]
    fn test_ready_transition() {
        let mut status = SessionStatus::new();
        status.authenticated();
        status.ready();
        assert_eq!(status.state, SessionState::Ready);
    }
}

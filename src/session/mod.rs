// ABOUTME: Session abstraction for task execution targets
// ABOUTME: Defines the host-identity contract and a basic in-memory session

use std::sync::Arc;

/// An opaque execution target for tasks, e.g. a remote host.
///
/// The engine only requires a stable host identity, used to key the
/// session's summary in the run result. Everything else about the
/// session (transport, credentials, connection state) belongs to the
/// task implementations.
pub trait Session: Send + Sync {
    /// Stable identity for this session. Summaries are keyed by it.
    fn host(&self) -> &str;
}

/// Shared handle to a session, passed opaquely to task handlers.
pub type SessionRef = Arc<dyn Session>;

/// Minimal session carrying nothing but its host identity.
#[derive(Debug, Clone)]
pub struct HostSession {
    host: String,
}

impl HostSession {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Session for HostSession {
    fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_session_identity() {
        let session = HostSession::new("web-01");
        assert_eq!(session.host(), "web-01");
    }

    #[test]
    fn test_session_ref_is_opaque() {
        let session: SessionRef = Arc::new(HostSession::new("db-01"));
        assert_eq!(session.host(), "db-01");
    }
}

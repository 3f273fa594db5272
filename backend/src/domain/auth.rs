//! Seam to the external authentication provider.
//!
//! The provider is a black box that verifies credentials elsewhere; all
//! this system consumes is its stream of session-change events, plus the
//! ability to end the current session on user-initiated logout.

use tokio::sync::broadcast;

/// Raw event as emitted by the authentication provider.
/// The provider may emit duplicates; the session monitor dedupes them.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn { user_id: String },
    SignedOut,
}

/// Interface to the authentication provider
pub trait AuthProvider: Send + Sync {
    /// Subscribe to session-change events
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// End the current session; observers learn of it through the event stream
    fn sign_out(&self);
}

/// In-process provider backed by a broadcast channel.
///
/// The external authenticator (or a test) drives it through
/// [`establish_session`](Self::establish_session) and
/// [`clear_session`](Self::clear_session).
#[derive(Clone)]
pub struct ChannelAuthProvider {
    events: broadcast::Sender<SessionEvent>,
}

impl ChannelAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self { events }
    }

    /// Announce a valid session for the given user
    pub fn establish_session(&self, user_id: &str) {
        // A send only fails with no subscribers, which is not an error here
        let _ = self.events.send(SessionEvent::SignedIn {
            user_id: user_id.to_string(),
        });
    }

    /// Announce that no session exists anymore
    pub fn clear_session(&self) {
        let _ = self.events.send(SessionEvent::SignedOut);
    }
}

impl Default for ChannelAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for ChannelAuthProvider {
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn sign_out(&self) {
        self.clear_session();
    }
}

//! # Session Monitor
//!
//! Observes the authentication provider's event stream and forwards one
//! normalized signal per actual session transition. Duplicate events for
//! an unchanged session are swallowed here so downstream components never
//! see redundant work. The monitor never fetches data itself.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::auth::{AuthProvider, SessionEvent};
use crate::domain::errors::SessionError;

/// Normalized session transition forwarded to the application shell
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    Present { user_id: String },
    Absent,
}

pub struct SessionMonitor {
    events: broadcast::Receiver<SessionEvent>,
    current_user: Option<String>,
}

impl SessionMonitor {
    /// Subscribe once to the provider's session-change stream
    pub fn new(provider: &dyn AuthProvider) -> Self {
        Self {
            events: provider.subscribe(),
            current_user: None,
        }
    }

    /// Wait for the next actual session transition.
    ///
    /// Returns `None` once the provider stream closes. A lagged receiver
    /// is reported and resynchronized rather than treated as fatal.
    pub async fn next_transition(&mut self) -> Option<SessionSignal> {
        loop {
            match self.events.recv().await {
                Ok(SessionEvent::SignedIn { user_id }) => {
                    if self.current_user.as_deref() == Some(user_id.as_str()) {
                        debug!(user_id = %user_id, "duplicate signed-in event ignored");
                        continue;
                    }
                    self.current_user = Some(user_id.clone());
                    return Some(SessionSignal::Present { user_id });
                }
                Ok(SessionEvent::SignedOut) => {
                    if self.current_user.is_none() {
                        debug!("signed-out event while already signed out, ignored");
                        continue;
                    }
                    self.current_user = None;
                    return Some(SessionSignal::Absent);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("{}", SessionError::Lagged(skipped));
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("{}", SessionError::StreamClosed);
                    return None;
                }
            }
        }
    }
}

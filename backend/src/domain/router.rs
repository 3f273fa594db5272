//! # View Router
//!
//! Finite state machine over the named screens. Transitions are a pure
//! reducer so they can be tested without any runtime; [`ViewRouter`] is
//! the thin stateful wrapper the shell drives.

use chrono::NaiveDate;
use shared::View;
use tracing::info;

/// Navigation events the router reduces over
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    GoToLogin,
    GoToRegister,
    /// Registration completed; the user still has to log in
    Registered,
    /// A session is active and its first snapshot is ready
    SessionEstablished,
    OpenHistory,
    /// Open the detail view for one day, carrying the selected date
    SelectDay(NaiveDate),
    OpenFixedCosts,
    OpenTodayReport,
    GoBack,
    /// The session became absent; overrides every other transition
    SessionEnded,
}

/// Guard inputs consulted during a transition
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterGuards {
    /// Whether a snapshot load has completed for the active session
    pub snapshot_ready: bool,
}

/// Pure transition function.
///
/// Unmatched event/state pairs leave the view unchanged. Entering `Report`
/// is always allowed: a missing record for today is a displayable state,
/// resolved by the view through [`shared::AppState::record_for`].
pub fn transition(current: View, event: NavEvent, guards: RouterGuards) -> View {
    // Session loss wins over everything else, from any state
    if event == NavEvent::SessionEnded {
        return View::Welcome;
    }

    match (current, event) {
        (View::Welcome, NavEvent::GoToLogin) => View::Login,
        (View::Welcome, NavEvent::GoToRegister) => View::Register,
        (View::Register, NavEvent::Registered) => View::Login,

        // Covers login succeeded as well as a session restored at startup
        (View::Welcome | View::Login | View::Register, NavEvent::SessionEstablished)
            if guards.snapshot_ready =>
        {
            View::Today
        }

        (View::Today, NavEvent::OpenHistory) => View::History,
        (View::History, NavEvent::SelectDay(date)) => View::DayDetail(date),
        (View::Today, NavEvent::OpenFixedCosts) => View::FixedCosts,
        (View::Today, NavEvent::OpenTodayReport) => View::Report,

        (View::Login | View::Register, NavEvent::GoBack) => View::Welcome,
        (View::History | View::FixedCosts | View::Report, NavEvent::GoBack) => View::Today,
        (View::DayDetail(_), NavEvent::GoBack) => View::History,

        (state, _) => state,
    }
}

/// Holds the currently displayed screen for the life of the process
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self { current: View::Welcome }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Apply one event, returning the (possibly unchanged) active view
    pub fn apply(&mut self, event: NavEvent, guards: RouterGuards) -> View {
        let next = transition(self.current, event, guards);
        if next != self.current {
            info!(from = ?self.current, to = ?next, ?event, "view transition");
        }
        self.current = next;
        next
    }

    /// The selected date while on the day detail view
    pub fn selected_day(&self) -> Option<NaiveDate> {
        match self.current {
            View::DayDetail(date) => Some(date),
            _ => None,
        }
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

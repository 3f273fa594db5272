//! # Application Shell
//!
//! Composes the session monitor, snapshot loader, view router and record
//! write path. All branching the view layer needs is determined here:
//! which screen is active, whether the system is in its transient loading
//! condition, and what data the screens render.
//!
//! The shell is the single writer of [`AppState`]: the state is only ever
//! replaced whole by a completed snapshot load, or reset to empty when the
//! session ends. Every load is tagged with the session it was issued for
//! plus a sequence number; a completion whose tag is no longer current is
//! discarded, so a slow response for a previous user can never corrupt the
//! snapshot of the current one.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use shared::{AppState, DailyRecord, User, View};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::auth::AuthProvider;
use crate::domain::errors::LoadError;
use crate::domain::records::RecordService;
use crate::domain::router::{NavEvent, RouterGuards, ViewRouter};
use crate::domain::session::{SessionMonitor, SessionSignal};
use crate::domain::snapshot::SnapshotLoader;
use crate::storage::traits::RemoteStore;

/// Completion of one tagged snapshot load
struct LoadOutcome {
    session_user: String,
    seq: u64,
    result: Result<AppState, LoadError>,
}

pub struct AppShell {
    state: AppState,
    router: ViewRouter,
    loader: SnapshotLoader,
    records: RecordService,
    monitor: SessionMonitor,
    auth: Arc<dyn AuthProvider>,
    current_user: Option<String>,
    /// Monotonic tag; only the most recently issued load may apply
    load_seq: u64,
    loading: bool,
    snapshot_ready: bool,
    notice: Option<String>,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl AppShell {
    pub fn new(store: Arc<dyn RemoteStore>, auth: Arc<dyn AuthProvider>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::empty(),
            router: ViewRouter::new(),
            loader: SnapshotLoader::new(store.clone()),
            records: RecordService::new(store),
            monitor: SessionMonitor::new(auth.as_ref()),
            auth,
            current_user: None,
            load_seq: 0,
            // The first session signal resolves whether anyone is signed in
            loading: true,
            snapshot_ready: false,
            notice: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.router.current()
    }

    /// Whether rendering is gated on an unresolved session or load
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Non-fatal message to surface to the user, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Record for the current calendar date, if the driver has logged one
    pub fn today_record(&self) -> Option<&DailyRecord> {
        self.state.record_for(Local::now().date_naive())
    }

    /// The selected date while on the day detail view
    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.router.selected_day()
    }

    /// Route a navigation event through the view state machine
    pub fn navigate(&mut self, event: NavEvent) -> View {
        self.router.apply(event, self.guards())
    }

    /// Flip the color scheme; survives snapshot replacement
    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
    }

    /// User-initiated logout; the reset happens when the provider's
    /// session-absent event comes back around
    pub fn sign_out(&self) {
        self.auth.sign_out();
    }

    /// Drive the shell until the auth provider's event stream closes
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                signal = self.monitor.next_transition() => match signal {
                    Some(signal) => self.handle_session(signal),
                    None => {
                        info!("session stream closed, shutting down shell");
                        break;
                    }
                },
                Some(outcome) = self.outcome_rx.recv() => self.apply_load_outcome(outcome),
            }
        }
    }

    /// React to a normalized session transition
    pub fn handle_session(&mut self, signal: SessionSignal) {
        match signal {
            SessionSignal::Present { user_id } => {
                info!(user_id = %user_id, "session present, scheduling snapshot load");
                self.current_user = Some(user_id.clone());
                self.snapshot_ready = false;
                self.loading = true;
                self.notice = None;
                self.spawn_load(user_id);
            }
            SessionSignal::Absent => {
                info!("session absent, clearing state");
                self.current_user = None;
                self.snapshot_ready = false;
                self.loading = false;
                self.notice = None;
                // Orphan any in-flight load so its result is discarded
                self.load_seq += 1;
                let theme = self.state.theme;
                self.state = AppState::empty();
                self.state.theme = theme;
                self.router.apply(NavEvent::SessionEnded, RouterGuards::default());
            }
        }
    }

    /// Re-fetch the full snapshot for the active session
    pub fn refresh(&mut self) {
        if let Some(user_id) = self.current_user.clone() {
            self.loading = true;
            self.spawn_load(user_id);
        }
    }

    fn guards(&self) -> RouterGuards {
        RouterGuards { snapshot_ready: self.snapshot_ready }
    }

    fn spawn_load(&mut self, user_id: String) {
        self.load_seq += 1;
        let seq = self.load_seq;
        let loader = self.loader.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&user_id).await;
            let _ = outcome_tx.send(LoadOutcome { session_user: user_id, seq, result });
        });
    }

    /// Apply a completed load, unless its session tag has gone stale
    fn apply_load_outcome(&mut self, outcome: LoadOutcome) {
        let current = self.current_user.as_deref() == Some(outcome.session_user.as_str());
        if outcome.seq != self.load_seq || !current {
            debug!(seq = outcome.seq, user_id = %outcome.session_user, "discarding stale snapshot load");
            return;
        }

        match outcome.result {
            Ok(mut snapshot) => {
                // Theme is a local preference, not remote data
                snapshot.theme = self.state.theme;
                self.state = snapshot;
                self.loading = false;
                self.snapshot_ready = true;
                self.notice = None;
                self.router.apply(NavEvent::SessionEstablished, self.guards());
            }
            Err(err) => {
                warn!(error = %err, "snapshot load failed");
                self.loading = false;
                self.notice = Some(format!("Failed to load your data: {}", err));
            }
        }
    }

    fn require_session(&self) -> Result<String> {
        self.current_user
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No active session"))
    }

    /// Create or update the record for a date, then re-fetch the snapshot
    pub async fn save_day(&mut self, date: NaiveDate, earnings: f64, mileage: i64) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.upsert_daily_record(&user_id, date, earnings, mileage).await?;
        self.refresh();
        Ok(())
    }

    /// Finalize the record for a date, then re-fetch the snapshot
    pub async fn close_day(&mut self, date: NaiveDate) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.close_day(&user_id, date).await?;
        self.refresh();
        Ok(())
    }

    /// Add an expense under the record for a date, then re-fetch the snapshot
    pub async fn add_expense(&mut self, date: NaiveDate, expense_type: &str, amount: f64) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.add_expense(&user_id, date, expense_type, amount).await?;
        self.refresh();
        Ok(())
    }

    /// Remove an expense, then re-fetch the snapshot
    pub async fn remove_expense(&mut self, expense_id: &str) -> Result<()> {
        self.require_session()?;
        self.records.remove_expense(expense_id).await?;
        self.refresh();
        Ok(())
    }

    /// Add a recurring monthly cost, then re-fetch the snapshot
    pub async fn add_fixed_cost(&mut self, name: &str, monthly_amount: f64) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.add_fixed_cost(&user_id, name, monthly_amount).await?;
        self.refresh();
        Ok(())
    }

    /// Remove a recurring monthly cost, then re-fetch the snapshot
    pub async fn remove_fixed_cost(&mut self, cost_id: &str) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.remove_fixed_cost(&user_id, cost_id).await?;
        self.refresh();
        Ok(())
    }

    /// Create or replace the signed-in user's profile, then re-fetch the snapshot
    pub async fn save_profile(&mut self, user: &User) -> Result<()> {
        let user_id = self.require_session()?;
        self.records.save_profile(&user_id, user).await?;
        self.refresh();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::Theme;
    use std::sync::atomic::AtomicBool;

    use crate::domain::auth::ChannelAuthProvider;
    use crate::storage::rows::{DailyRecordRow, ProfileRow};
    use crate::storage::sqlite::{DbConnection, SqliteStore};
    use crate::storage::test_utils::FakeStore;
    use crate::storage::traits::ProfileStorage;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn present(user_id: &str) -> SessionSignal {
        SessionSignal::Present { user_id: user_id.to_string() }
    }

    fn profile_row(user_id: &str, first_name: &str) -> ProfileRow {
        ProfileRow {
            id: user_id.to_string(),
            first_name: Some(first_name.to_string()),
            last_name: None,
            email: None,
            phone: None,
        }
    }

    fn record_row(date: &str) -> DailyRecordRow {
        DailyRecordRow {
            id: format!("r-{}", date),
            user_id: "u1".to_string(),
            date: date.to_string(),
            earnings: json!("120.50"),
            mileage: json!(80),
            is_closed: json!(0),
            expenses: Vec::new(),
        }
    }

    fn shell_with(store: Arc<dyn RemoteStore>) -> AppShell {
        AppShell::new(store, Arc::new(ChannelAuthProvider::new()))
    }

    /// Drive one spawned load to completion and apply its outcome
    async fn pump_one_load(shell: &mut AppShell) {
        let outcome = shell.outcome_rx.recv().await.expect("no load outcome");
        shell.apply_load_outcome(outcome);
    }

    #[tokio::test]
    async fn test_present_session_applies_snapshot_and_enters_today() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            records: vec![record_row("2024-05-01")],
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        assert!(shell.is_loading());

        pump_one_load(&mut shell).await;

        assert!(!shell.is_loading());
        assert_eq!(shell.view(), View::Today);
        assert_eq!(shell.state().user.as_ref().map(|u| u.first_name.as_str()), Some("Ana"));
        assert_eq!(shell.state().daily_records.len(), 1);
        assert_eq!(shell.state().daily_records[0].earnings, 120.5);
    }

    #[tokio::test]
    async fn test_absent_session_resets_everything() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            records: vec![record_row("2024-05-01")],
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        pump_one_load(&mut shell).await;
        assert_eq!(shell.view(), View::Today);

        shell.handle_session(SessionSignal::Absent);

        assert_eq!(shell.view(), View::Welcome);
        assert!(shell.state().user.is_none());
        assert!(shell.state().daily_records.is_empty());
        assert!(shell.state().fixed_costs.is_empty());
        assert!(!shell.is_loading());
    }

    #[tokio::test]
    async fn test_load_completing_after_sign_out_is_discarded() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        // The load settles, but the user signs out before it is applied
        let outcome = shell.outcome_rx.recv().await.expect("no load outcome");
        shell.handle_session(SessionSignal::Absent);
        shell.apply_load_outcome(outcome);

        assert!(shell.state().user.is_none());
        assert_eq!(shell.view(), View::Welcome);
    }

    #[tokio::test]
    async fn test_load_for_previous_user_is_discarded() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        let stale = shell.outcome_rx.recv().await.expect("no load outcome");

        // A different user signs in before the first load is applied
        shell.handle_session(present("u2"));
        shell.apply_load_outcome(stale);
        assert!(shell.is_loading(), "stale load must not complete the new session");

        pump_one_load(&mut shell).await;
        assert!(!shell.is_loading());
        assert_eq!(shell.view(), View::Today);
    }

    #[tokio::test]
    async fn test_failed_load_preserves_prior_state() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            records: vec![record_row("2024-05-01")],
            ..FakeStore::default()
        });
        let mut shell = shell_with(store.clone());

        shell.handle_session(present("u1"));
        pump_one_load(&mut shell).await;
        let before = shell.state().clone();

        store.set_fail_costs(true);
        shell.refresh();
        pump_one_load(&mut shell).await;

        assert_eq!(shell.state(), &before);
        assert!(!shell.is_loading());
        assert!(shell.notice().unwrap_or_default().contains("fixed_costs"));

        // The failure is recoverable: a later refresh succeeds and clears the notice
        store.set_fail_costs(false);
        shell.refresh();
        pump_one_load(&mut shell).await;
        assert!(shell.notice().is_none());
    }

    #[tokio::test]
    async fn test_initial_load_failure_stays_recoverable() {
        let store = Arc::new(FakeStore {
            fail_costs: AtomicBool::new(true),
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        pump_one_load(&mut shell).await;

        assert!(shell.notice().is_some());
        assert_eq!(shell.view(), View::Welcome, "an unloaded session never enters Today");
        assert!(shell.state().user.is_none());
    }

    #[tokio::test]
    async fn test_theme_survives_snapshot_replacement() {
        let store = Arc::new(FakeStore {
            profile: Some(profile_row("u1", "Ana")),
            ..FakeStore::default()
        });
        let mut shell = shell_with(store);

        shell.handle_session(present("u1"));
        pump_one_load(&mut shell).await;

        shell.toggle_theme();
        assert_eq!(shell.state().theme, Theme::Dark);

        shell.refresh();
        pump_one_load(&mut shell).await;
        assert_eq!(shell.state().theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_sign_out_goes_through_the_provider() {
        let provider = Arc::new(ChannelAuthProvider::new());
        let shell = AppShell::new(Arc::new(FakeStore::default()), provider.clone());
        let mut rx = provider.subscribe();

        shell.sign_out();

        assert_eq!(rx.recv().await.unwrap(), crate::domain::auth::SessionEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_mutations_require_a_session() {
        let mut shell = shell_with(Arc::new(FakeStore::default()));

        assert!(shell.save_day(day("2024-05-01"), 120.5, 80).await.is_err());
        assert!(shell.add_expense(day("2024-05-01"), "fuel", 30.0).await.is_err());
        assert!(shell.add_fixed_cost("Insurance", 150.0).await.is_err());
    }

    #[tokio::test]
    async fn test_mutation_then_reload_makes_change_visible() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let store = Arc::new(SqliteStore::new(db));
        store
            .upsert_profile("u1", &User {
                first_name: "Ana".to_string(),
                last_name: "Silva".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
            })
            .await
            .expect("seed profile failed");

        let mut shell = shell_with(store.clone());
        shell.handle_session(present("u1"));
        pump_one_load(&mut shell).await;
        assert!(shell.state().daily_records.is_empty());

        shell.save_day(day("2024-05-01"), 120.5, 80).await.expect("save failed");
        pump_one_load(&mut shell).await;
        assert_eq!(shell.state().daily_records.len(), 1);

        shell.add_expense(day("2024-05-01"), "fuel", 30.0).await.expect("add expense failed");
        pump_one_load(&mut shell).await;
        assert_eq!(shell.state().daily_records[0].expenses.len(), 1);
        assert_eq!(shell.state().daily_records[0].expenses[0].amount, 30.0);

        // Navigation over the loaded data carries the selected day
        shell.navigate(NavEvent::OpenHistory);
        shell.navigate(NavEvent::SelectDay(day("2024-05-01")));
        assert_eq!(shell.selected_day(), Some(day("2024-05-01")));
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account holder profile, derived 1:1 from the remote profile row.
///
/// Present in [`AppState`] only while a valid session exists; a session
/// without a profile row is a legitimate state (freshly registered user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Optional contact number; the remote profile row may omit it
    pub phone: Option<String>,
}

/// A recurring monthly cost (vehicle lease, insurance, phone plan, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: String,
    pub name: String,
    pub monthly_amount: f64,
}

/// A single itemized expense belonging to exactly one daily record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Expense category as reported by the remote store (e.g. "fuel")
    pub expense_type: String,
    pub amount: f64,
}

/// One working day: earnings, mileage and itemized expenses.
///
/// There is at most one record per user per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub earnings: f64,
    pub mileage: i64,
    /// A closed day is finalized and no longer accepts edits
    pub is_closed: bool,
    pub expenses: Vec<Expense>,
}

impl DailyRecord {
    /// Sum of all itemized expenses for this day
    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Earnings after itemized expenses
    pub fn net_earnings(&self) -> f64 {
        self.earnings - self.total_expenses()
    }
}

/// Color scheme selection carried alongside the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The synchronized in-memory snapshot the view layer consumes.
///
/// Created empty at process start, fully replaced (never merged) on every
/// successful snapshot load, and reset to empty when the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub user: Option<User>,
    /// Daily records ordered by date descending, at most one per date
    pub daily_records: Vec<DailyRecord>,
    pub fixed_costs: Vec<FixedCost>,
    pub theme: Theme,
}

impl AppState {
    /// The state before any session exists: no user, no data
    pub fn empty() -> Self {
        Self {
            user: None,
            daily_records: Vec::new(),
            fixed_costs: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// Record for the given calendar date, if one exists
    pub fn record_for(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.daily_records.iter().find(|r| r.date == date)
    }

    /// Sum of all recurring monthly costs
    pub fn monthly_fixed_total(&self) -> f64 {
        self.fixed_costs.iter().map(|c| c.monthly_amount).sum()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Screens the application can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Welcome,
    Login,
    Register,
    Today,
    History,
    FixedCosts,
    /// Detail for a single day, carrying the selected date
    DayDetail(NaiveDate),
    Report,
}

impl View {
    /// Whether this screen is only reachable with an active session
    pub fn requires_session(&self) -> bool {
        !matches!(self, View::Welcome | View::Login | View::Register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, earnings: f64, expenses: &[f64]) -> DailyRecord {
        DailyRecord {
            date: date.parse().unwrap(),
            earnings,
            mileage: 0,
            is_closed: false,
            expenses: expenses
                .iter()
                .enumerate()
                .map(|(i, amount)| Expense {
                    id: format!("e{}", i),
                    expense_type: "fuel".to_string(),
                    amount: *amount,
                })
                .collect(),
        }
    }

    #[test]
    fn test_daily_record_totals() {
        let rec = record("2024-05-01", 120.5, &[30.0, 12.5]);
        assert_eq!(rec.total_expenses(), 42.5);
        assert_eq!(rec.net_earnings(), 78.0);

        let empty = record("2024-05-02", 80.0, &[]);
        assert_eq!(empty.total_expenses(), 0.0);
        assert_eq!(empty.net_earnings(), 80.0);
    }

    #[test]
    fn test_empty_state() {
        let state = AppState::empty();
        assert!(state.user.is_none());
        assert!(state.daily_records.is_empty());
        assert!(state.fixed_costs.is_empty());
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn test_record_for() {
        let state = AppState {
            daily_records: vec![record("2024-05-02", 90.0, &[]), record("2024-05-01", 120.5, &[])],
            ..AppState::empty()
        };

        let found = state.record_for("2024-05-01".parse().unwrap());
        assert_eq!(found.map(|r| r.earnings), Some(120.5));
        assert!(state.record_for("2024-04-30".parse().unwrap()).is_none());
    }

    #[test]
    fn test_monthly_fixed_total() {
        let state = AppState {
            fixed_costs: vec![
                FixedCost {
                    id: "c1".to_string(),
                    name: "Insurance".to_string(),
                    monthly_amount: 150.0,
                },
                FixedCost {
                    id: "c2".to_string(),
                    name: "Phone".to_string(),
                    monthly_amount: 35.5,
                },
            ],
            ..AppState::empty()
        };
        assert_eq!(state.monthly_fixed_total(), 185.5);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_view_requires_session() {
        assert!(!View::Welcome.requires_session());
        assert!(!View::Login.requires_session());
        assert!(!View::Register.requires_session());
        assert!(View::Today.requires_session());
        assert!(View::DayDetail("2024-05-01".parse().unwrap()).requires_session());
        assert!(View::Report.requires_session());
    }
}

//! # Snapshot Loader
//!
//! Fetches the three remote collections for a user concurrently, joins
//! them once all three have settled, and normalizes the loose remote
//! shapes into one consistent [`AppState`]. No partial snapshot is ever
//! produced: any fetch failure surfaces as a single [`LoadError`] and the
//! caller keeps whatever state it had before.
//!
//! ## Normalization policy
//!
//! Numeric fields (`earnings`, `monthly_amount`, `amount`, `mileage`)
//! accept numbers and numeric strings; missing or malformed values fall
//! back to zero with a warning. `is_closed` accepts any truthy remote
//! representation. Structurally required fields (`id`, `date`) have no
//! sensible default, so a malformed one fails the load instead.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use shared::{AppState, DailyRecord, Expense, FixedCost, Theme, User};
use tracing::{info, warn};

use crate::domain::errors::{LoadError, NormalizationError};
use crate::storage::rows::{DailyRecordRow, ExpenseRow, FixedCostRow, ProfileRow};
use crate::storage::traits::RemoteStore;

#[derive(Clone)]
pub struct SnapshotLoader {
    store: Arc<dyn RemoteStore>,
}

impl SnapshotLoader {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Fetch profile, fixed costs and daily records concurrently and join
    /// them into a fresh snapshot for the given user
    pub async fn load(&self, user_id: &str) -> Result<AppState, LoadError> {
        info!(user_id = %user_id, "loading snapshot");

        let (profile, costs, records) = tokio::join!(
            self.store.get_profile(user_id),
            self.store.list_fixed_costs(user_id),
            self.store.list_daily_records(user_id),
        );

        let profile = profile.map_err(|source| LoadError::Fetch { collection: "profile", source })?;
        let costs = costs.map_err(|source| LoadError::Fetch { collection: "fixed_costs", source })?;
        let records = records.map_err(|source| LoadError::Fetch { collection: "daily_records", source })?;

        let snapshot = AppState {
            // A session without a profile row is not an error
            user: profile.map(normalize_profile),
            fixed_costs: costs.iter().map(normalize_fixed_cost).collect(),
            daily_records: normalize_daily_records(records)?,
            theme: Theme::default(),
        };

        info!(
            user_id = %user_id,
            records = snapshot.daily_records.len(),
            fixed_costs = snapshot.fixed_costs.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

fn normalize_profile(row: ProfileRow) -> User {
    User {
        first_name: row.first_name.unwrap_or_default(),
        last_name: row.last_name.unwrap_or_default(),
        email: row.email.unwrap_or_default(),
        phone: row.phone,
    }
}

fn normalize_fixed_cost(row: &FixedCostRow) -> FixedCost {
    FixedCost {
        id: row.id.clone(),
        name: row.name.clone().unwrap_or_default(),
        monthly_amount: coerce_decimal("monthly_amount", &row.monthly_amount),
    }
}

fn normalize_expense(row: ExpenseRow) -> Expense {
    Expense {
        id: row.id,
        expense_type: row.expense_type.unwrap_or_default(),
        amount: coerce_decimal("amount", &row.amount),
    }
}

fn normalize_daily_records(rows: Vec<DailyRecordRow>) -> Result<Vec<DailyRecord>, NormalizationError> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let date = parse_date(&row.date)?;
        // At most one record per date; rows arrive most recent first
        if !seen.insert(date) {
            warn!(%date, "duplicate daily record dropped");
            continue;
        }
        records.push(DailyRecord {
            date,
            earnings: coerce_decimal("earnings", &row.earnings),
            mileage: coerce_integer("mileage", &row.mileage),
            is_closed: coerce_flag(&row.is_closed),
            expenses: row.expenses.into_iter().map(normalize_expense).collect(),
        });
    }

    // The store promises date-descending order; enforce it anyway
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(records)
}

fn parse_date(raw: &str) -> Result<NaiveDate, NormalizationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| NormalizationError {
        field: "date",
        reason: format!("{:?} is not a calendar date", raw),
    })
}

/// Coerce a loosely-typed remote numeric into f64, defaulting to zero
fn coerce_decimal(field: &'static str, value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or_else(|_| {
            warn!(field, raw = %s, "non-numeric value, using 0");
            0.0
        }),
        Value::Null => 0.0,
        other => {
            warn!(field, raw = %other, "unexpected value shape, using 0");
            0.0
        }
    }
}

/// Coerce a loosely-typed remote integer into i64, defaulting to zero
fn coerce_integer(field: &'static str, value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => s.trim().parse().unwrap_or_else(|_| {
            warn!(field, raw = %s, "non-numeric value, using 0");
            0
        }),
        Value::Null => 0,
        other => {
            warn!(field, raw = %other, "unexpected value shape, using 0");
            0
        }
    }
}

/// Coerce any truthy remote representation into a boolean
fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "t" | "1"),
        _ => false,
    }
}

//! Write path for the four collections.
//!
//! Mutations validate input, write through the store adapter, and leave
//! refreshing to the caller: the system never patches the snapshot
//! incrementally, it re-fetches it whole.

use anyhow::Result;
use chrono::NaiveDate;
use shared::User;
use std::sync::Arc;
use tracing::info;

use crate::storage::traits::RemoteStore;

/// Service for mutating records, expenses, fixed costs and the profile
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RemoteStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Create or replace the profile for a user
    pub async fn save_profile(&self, user_id: &str, user: &User) -> Result<()> {
        if user.email.trim().is_empty() {
            return Err(anyhow::anyhow!("Email cannot be empty"));
        }

        self.store.upsert_profile(user_id, user).await?;
        info!(user_id = %user_id, "profile saved");
        Ok(())
    }

    /// Create or update the record for a date
    pub async fn upsert_daily_record(&self, user_id: &str, date: NaiveDate, earnings: f64, mileage: i64) -> Result<String> {
        if !earnings.is_finite() || earnings < 0.0 {
            return Err(anyhow::anyhow!("Earnings must be a non-negative amount"));
        }
        if mileage < 0 {
            return Err(anyhow::anyhow!("Mileage cannot be negative"));
        }

        let id = self
            .store
            .upsert_daily_record(user_id, &date.to_string(), earnings, mileage)
            .await?;
        info!(user_id = %user_id, %date, "daily record saved");
        Ok(id)
    }

    /// Finalize the record for a date; it no longer accepts edits afterwards
    pub async fn close_day(&self, user_id: &str, date: NaiveDate) -> Result<()> {
        let closed = self.store.close_daily_record(user_id, &date.to_string()).await?;
        if !closed {
            return Err(anyhow::anyhow!("No record to close for {}", date));
        }
        info!(user_id = %user_id, %date, "daily record closed");
        Ok(())
    }

    /// Add an itemized expense under the record for a date
    pub async fn add_expense(&self, user_id: &str, date: NaiveDate, expense_type: &str, amount: f64) -> Result<String> {
        if expense_type.trim().is_empty() {
            return Err(anyhow::anyhow!("Expense type cannot be empty"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(anyhow::anyhow!("Expense amount must be positive"));
        }

        let id = self
            .store
            .store_expense(user_id, &date.to_string(), expense_type.trim(), amount)
            .await?;
        info!(user_id = %user_id, %date, expense_type, "expense added");
        Ok(id)
    }

    /// Remove an itemized expense
    pub async fn remove_expense(&self, expense_id: &str) -> Result<()> {
        let deleted = self.store.delete_expense(expense_id).await?;
        if !deleted {
            return Err(anyhow::anyhow!("Expense not found: {}", expense_id));
        }
        info!(expense_id, "expense removed");
        Ok(())
    }

    /// Add a recurring monthly cost
    pub async fn add_fixed_cost(&self, user_id: &str, name: &str, monthly_amount: f64) -> Result<String> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Fixed cost name cannot be empty"));
        }
        if !monthly_amount.is_finite() || monthly_amount < 0.0 {
            return Err(anyhow::anyhow!("Monthly amount must be a non-negative amount"));
        }

        let id = self.store.store_fixed_cost(user_id, name.trim(), monthly_amount).await?;
        info!(user_id = %user_id, name, "fixed cost added");
        Ok(id)
    }

    /// Remove a recurring monthly cost
    pub async fn remove_fixed_cost(&self, user_id: &str, cost_id: &str) -> Result<()> {
        let deleted = self.store.delete_fixed_cost(user_id, cost_id).await?;
        if !deleted {
            return Err(anyhow::anyhow!("Fixed cost not found: {}", cost_id));
        }
        info!(user_id = %user_id, cost_id, "fixed cost removed");
        Ok(())
    }
}

//! # Storage Traits
//!
//! This module defines the storage abstraction traits that stand between
//! the domain layer and whatever service actually persists the data.
//!
//! Reads return raw [`rows`](super::rows) in the remote's loose shapes;
//! normalization happens once, in the snapshot loader. Writes take already
//! typed values, since heterogeneity is a read-side phenomenon.

use anyhow::Result;
use async_trait::async_trait;
use shared::User;

use super::rows::{DailyRecordRow, FixedCostRow, ProfileRow};

/// Interface for profile storage operations
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Retrieve the profile row for a user, if one exists
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>>;

    /// Create or replace the profile row for a user
    async fn upsert_profile(&self, user_id: &str, user: &User) -> Result<()>;
}

/// Interface for recurring fixed cost storage operations
#[async_trait]
pub trait FixedCostStorage: Send + Sync {
    /// List all fixed costs for a user, ordered by name ascending
    async fn list_fixed_costs(&self, user_id: &str) -> Result<Vec<FixedCostRow>>;

    /// Store a new fixed cost, returning its generated id
    async fn store_fixed_cost(&self, user_id: &str, name: &str, monthly_amount: f64) -> Result<String>;

    /// Delete a fixed cost by id.
    /// Returns true if the cost was found and deleted, false otherwise
    async fn delete_fixed_cost(&self, user_id: &str, cost_id: &str) -> Result<bool>;
}

/// Interface for daily record and nested expense storage operations
#[async_trait]
pub trait DailyRecordStorage: Send + Sync {
    /// List all daily records for a user with their nested expenses.
    /// Returns records pre-sorted by date descending (most recent first)
    async fn list_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecordRow>>;

    /// Create or update the record for a user and date, returning the record id.
    /// Fails if the record for that date has already been closed
    async fn upsert_daily_record(&self, user_id: &str, date: &str, earnings: f64, mileage: i64) -> Result<String>;

    /// Mark the record for a user and date as closed.
    /// Returns true if a record was found and closed, false otherwise
    async fn close_daily_record(&self, user_id: &str, date: &str) -> Result<bool>;

    /// Store a new expense under the record for a user and date, returning its id.
    /// Fails if no record exists for that date or the record is closed
    async fn store_expense(&self, user_id: &str, date: &str, expense_type: &str, amount: f64) -> Result<String>;

    /// Delete an expense by id.
    /// Returns true if the expense was found and deleted, false otherwise
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}

/// The full remote-store surface the snapshot loader and shell consume
pub trait RemoteStore: ProfileStorage + FixedCostStorage + DailyRecordStorage {}

impl<T: ProfileStorage + FixedCostStorage + DailyRecordStorage> RemoteStore for T {}

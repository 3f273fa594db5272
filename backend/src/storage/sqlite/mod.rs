//! Sqlite-backed implementation of the storage traits.
//!
//! Plays the role of the remote persistence service: one repository per
//! collection over a shared connection, composed into [`SqliteStore`].

pub mod connection;
pub mod repositories;

use anyhow::Result;
use async_trait::async_trait;
use shared::User;

use crate::storage::rows::{DailyRecordRow, FixedCostRow, ProfileRow};
use crate::storage::traits::{DailyRecordStorage, FixedCostStorage, ProfileStorage};

pub use connection::DbConnection;
pub use repositories::{DailyRecordRepository, FixedCostRepository, ProfileRepository};

/// Store adapter over all four collections, backed by one sqlite database
#[derive(Clone)]
pub struct SqliteStore {
    profiles: ProfileRepository,
    fixed_costs: FixedCostRepository,
    daily_records: DailyRecordRepository,
}

impl SqliteStore {
    pub fn new(db: DbConnection) -> Self {
        Self {
            profiles: ProfileRepository::new(db.clone()),
            fixed_costs: FixedCostRepository::new(db.clone()),
            daily_records: DailyRecordRepository::new(db),
        }
    }
}

#[async_trait]
impl ProfileStorage for SqliteStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.profiles.get_profile(user_id).await
    }

    async fn upsert_profile(&self, user_id: &str, user: &User) -> Result<()> {
        self.profiles.upsert_profile(user_id, user).await
    }
}

#[async_trait]
impl FixedCostStorage for SqliteStore {
    async fn list_fixed_costs(&self, user_id: &str) -> Result<Vec<FixedCostRow>> {
        self.fixed_costs.list_fixed_costs(user_id).await
    }

    async fn store_fixed_cost(&self, user_id: &str, name: &str, monthly_amount: f64) -> Result<String> {
        self.fixed_costs.store_fixed_cost(user_id, name, monthly_amount).await
    }

    async fn delete_fixed_cost(&self, user_id: &str, cost_id: &str) -> Result<bool> {
        self.fixed_costs.delete_fixed_cost(user_id, cost_id).await
    }
}

#[async_trait]
impl DailyRecordStorage for SqliteStore {
    async fn list_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecordRow>> {
        self.daily_records.list_daily_records(user_id).await
    }

    async fn upsert_daily_record(&self, user_id: &str, date: &str, earnings: f64, mileage: i64) -> Result<String> {
        self.daily_records.upsert_daily_record(user_id, date, earnings, mileage).await
    }

    async fn close_daily_record(&self, user_id: &str, date: &str) -> Result<bool> {
        self.daily_records.close_daily_record(user_id, date).await
    }

    async fn store_expense(&self, user_id: &str, date: &str, expense_type: &str, amount: f64) -> Result<String> {
        self.daily_records.store_expense(user_id, date, expense_type, amount).await
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        self.daily_records.delete_expense(expense_id).await
    }
}

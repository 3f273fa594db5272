//! In-memory store used by loader and shell tests: fixed data set at
//! construction, per-collection failure injection toggled at runtime.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use shared::User;

use crate::storage::rows::{DailyRecordRow, FixedCostRow, ProfileRow};
use crate::storage::traits::{DailyRecordStorage, FixedCostStorage, ProfileStorage};

#[derive(Default)]
pub struct FakeStore {
    pub profile: Option<ProfileRow>,
    pub costs: Vec<FixedCostRow>,
    pub records: Vec<DailyRecordRow>,
    pub fail_profile: AtomicBool,
    pub fail_costs: AtomicBool,
    pub fail_records: AtomicBool,
}

impl FakeStore {
    pub fn set_fail_costs(&self, fail: bool) {
        self.fail_costs.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStorage for FakeStore {
    async fn get_profile(&self, _user_id: &str) -> Result<Option<ProfileRow>> {
        if self.fail_profile.load(Ordering::SeqCst) {
            anyhow::bail!("profile fetch refused");
        }
        Ok(self.profile.clone())
    }

    async fn upsert_profile(&self, _user_id: &str, _user: &User) -> Result<()> {
        anyhow::bail!("writes not supported by the fake store");
    }
}

#[async_trait]
impl FixedCostStorage for FakeStore {
    async fn list_fixed_costs(&self, _user_id: &str) -> Result<Vec<FixedCostRow>> {
        if self.fail_costs.load(Ordering::SeqCst) {
            anyhow::bail!("fixed costs fetch refused");
        }
        Ok(self.costs.clone())
    }

    async fn store_fixed_cost(&self, _user_id: &str, _name: &str, _monthly_amount: f64) -> Result<String> {
        anyhow::bail!("writes not supported by the fake store");
    }

    async fn delete_fixed_cost(&self, _user_id: &str, _cost_id: &str) -> Result<bool> {
        anyhow::bail!("writes not supported by the fake store");
    }
}

#[async_trait]
impl DailyRecordStorage for FakeStore {
    async fn list_daily_records(&self, _user_id: &str) -> Result<Vec<DailyRecordRow>> {
        if self.fail_records.load(Ordering::SeqCst) {
            anyhow::bail!("daily records fetch refused");
        }
        Ok(self.records.clone())
    }

    async fn upsert_daily_record(&self, _user_id: &str, _date: &str, _earnings: f64, _mileage: i64) -> Result<String> {
        anyhow::bail!("writes not supported by the fake store");
    }

    async fn close_daily_record(&self, _user_id: &str, _date: &str) -> Result<bool> {
        anyhow::bail!("writes not supported by the fake store");
    }

    async fn store_expense(&self, _user_id: &str, _date: &str, _expense_type: &str, _amount: f64) -> Result<String> {
        anyhow::bail!("writes not supported by the fake store");
    }

    async fn delete_expense(&self, _expense_id: &str) -> Result<bool> {
        anyhow::bail!("writes not supported by the fake store");
    }
}

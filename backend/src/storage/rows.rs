//! Raw row shapes as the remote store returns them.
//!
//! Collections arrive with loosely-typed fields: decimals serialized as
//! strings or numbers, booleans as integers, optional columns simply
//! missing. Nothing outside the snapshot loader should ever consume these
//! shapes; the loader converts every field once into the canonical model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile row, 0 or 1 per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Recurring cost row, 0..n per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostRow {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Arbitrary-precision decimal on the remote side; string, number or null here
    #[serde(default)]
    pub monthly_amount: Value,
}

/// Itemized expense row nested under a daily record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub id: String,
    pub record_id: String,
    #[serde(rename = "type", default)]
    pub expense_type: Option<String>,
    #[serde(default)]
    pub amount: Value,
}

/// Daily record row with its nested expenses, 0..n per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecordRow {
    pub id: String,
    pub user_id: String,
    /// Calendar date as the remote stores it (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub earnings: Value,
    #[serde(default)]
    pub mileage: Value,
    #[serde(default)]
    pub is_closed: Value,
    #[serde(default)]
    pub expenses: Vec<ExpenseRow>,
}

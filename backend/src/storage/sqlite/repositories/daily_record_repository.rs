use anyhow::Result;
use serde_json::Value;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

use crate::storage::rows::{DailyRecordRow, ExpenseRow};
use crate::storage::sqlite::connection::DbConnection;

/// Repository for daily record and nested expense operations
#[derive(Clone)]
pub struct DailyRecordRepository {
    db: DbConnection,
}

impl DailyRecordRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List all records for a user with nested expenses, date descending
    pub async fn list_daily_records(&self, user_id: &str) -> Result<Vec<DailyRecordRow>> {
        let record_rows = sqlx::query(
            r#"
            SELECT id, user_id, date, earnings, mileage, is_closed
            FROM daily_records
            WHERE user_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        // One query for every expense of this user, grouped in memory
        let expense_rows = sqlx::query(
            r#"
            SELECT e.id, e.record_id, e.type, e.amount
            FROM expenses e
            JOIN daily_records r ON e.record_id = r.id
            WHERE r.user_id = ?
            ORDER BY e.created_at ASC, e.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut expenses_by_record: HashMap<String, Vec<ExpenseRow>> = HashMap::new();
        for row in &expense_rows {
            let expense = ExpenseRow {
                id: row.get("id"),
                record_id: row.get("record_id"),
                expense_type: row.get("type"),
                amount: Value::String(row.get("amount")),
            };
            expenses_by_record
                .entry(expense.record_id.clone())
                .or_default()
                .push(expense);
        }

        let records = record_rows
            .iter()
            .map(|row| {
                let id: String = row.get("id");
                let expenses = expenses_by_record.remove(&id).unwrap_or_default();
                DailyRecordRow {
                    id,
                    user_id: row.get("user_id"),
                    date: row.get("date"),
                    earnings: Value::String(row.get("earnings")),
                    mileage: Value::from(row.get::<i64, _>("mileage")),
                    is_closed: Value::from(row.get::<i64, _>("is_closed")),
                    expenses,
                }
            })
            .collect();

        Ok(records)
    }

    /// Create or update the record for a date, returning the record id.
    /// A closed record no longer accepts edits
    pub async fn upsert_daily_record(&self, user_id: &str, date: &str, earnings: f64, mileage: i64) -> Result<String> {
        let existing = sqlx::query(
            r#"
            SELECT id, is_closed FROM daily_records WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.db.pool())
        .await?;

        if let Some(row) = existing {
            if row.get::<i64, _>("is_closed") != 0 {
                return Err(anyhow::anyhow!("Record for {} is closed and cannot be edited", date));
            }

            let id: String = row.get("id");
            sqlx::query(
                r#"
                UPDATE daily_records
                SET earnings = ?, mileage = ?
                WHERE id = ?
                "#,
            )
            .bind(format!("{:.2}", earnings))
            .bind(mileage)
            .bind(&id)
            .execute(self.db.pool())
            .await?;
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO daily_records (id, user_id, date, earnings, mileage, is_closed)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(date)
        .bind(format!("{:.2}", earnings))
        .bind(mileage)
        .execute(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Mark the record for a date as closed, returning whether one was found
    pub async fn close_daily_record(&self, user_id: &str, date: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE daily_records SET is_closed = 1 WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store an expense under the record for a date, returning the expense id
    pub async fn store_expense(&self, user_id: &str, date: &str, expense_type: &str, amount: f64) -> Result<String> {
        let record = sqlx::query(
            r#"
            SELECT id, is_closed FROM daily_records WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| anyhow::anyhow!("No record exists for {}", date))?;

        if record.get::<i64, _>("is_closed") != 0 {
            return Err(anyhow::anyhow!("Record for {} is closed and cannot be edited", date));
        }

        let record_id: String = record.get("id");
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO expenses (id, record_id, type, amount)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&record_id)
        .bind(expense_type)
        .bind(format!("{:.2}", amount))
        .execute(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Delete an expense, returning whether a row was removed
    pub async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses WHERE id = ?
            "#,
        )
        .bind(expense_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

use anyhow::Result;
use serde_json::Value;
use sqlx::Row;
use uuid::Uuid;

use crate::storage::rows::FixedCostRow;
use crate::storage::sqlite::connection::DbConnection;

/// Repository for recurring fixed cost operations
#[derive(Clone)]
pub struct FixedCostRepository {
    db: DbConnection,
}

impl FixedCostRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List all fixed costs for a user ordered by name
    pub async fn list_fixed_costs(&self, user_id: &str) -> Result<Vec<FixedCostRow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, monthly_amount
            FROM fixed_costs
            WHERE user_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let costs = rows
            .iter()
            .map(|row| FixedCostRow {
                id: row.get("id"),
                user_id: row.get("user_id"),
                name: row.get("name"),
                // Decimals are stored as text, the same shape the remote serializes
                monthly_amount: Value::String(row.get("monthly_amount")),
            })
            .collect();

        Ok(costs)
    }

    /// Store a new fixed cost and return its generated id
    pub async fn store_fixed_cost(&self, user_id: &str, name: &str, monthly_amount: f64) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO fixed_costs (id, user_id, name, monthly_amount)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(format!("{:.2}", monthly_amount))
        .execute(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Delete a fixed cost, returning whether a row was removed
    pub async fn delete_fixed_cost(&self, user_id: &str, cost_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM fixed_costs WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(cost_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

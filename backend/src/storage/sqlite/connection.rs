use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create profiles table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                first_name TEXT,
                last_name TEXT,
                email TEXT,
                phone TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create fixed_costs table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fixed_costs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                monthly_amount TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for user_id filtering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_fixed_costs_user_id
            ON fixed_costs(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create daily_records table, one row per user per date
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                earnings TEXT NOT NULL DEFAULT '0',
                mileage INTEGER NOT NULL DEFAULT 0,
                is_closed INTEGER NOT NULL DEFAULT 0,
                UNIQUE(user_id, date)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for ordering records by date (most recent first)
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_daily_records_user_date
            ON daily_records(user_id, date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Create expenses table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                record_id TEXT NOT NULL,
                type TEXT NOT NULL,
                amount TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (record_id) REFERENCES daily_records (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for record_id filtering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_expenses_record_id
            ON expenses(record_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

use anyhow::Result;
use shared::User;
use sqlx::Row;

use crate::storage::rows::ProfileRow;
use crate::storage::sqlite::connection::DbConnection;

/// Repository for profile operations
#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Get the profile row for a user
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, phone
            FROM profiles
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(ProfileRow {
                id: r.get("id"),
                first_name: r.get("first_name"),
                last_name: r.get("last_name"),
                email: r.get("email"),
                phone: r.get("phone"),
            })),
            None => Ok(None),
        }
    }

    /// Create or replace the profile row for a user
    pub async fn upsert_profile(&self, user_id: &str, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, first_name, last_name, email, phone)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                phone = excluded.phone
            "#,
        )
        .bind(user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> ProfileRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ProfileRepository::new(db)
    }

    fn sample_user() -> User {
        User {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("555-0101".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_missing_profile() {
        let repo = setup_test().await;

        let profile = repo.get_profile("u1").await.expect("Failed to query profile");
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get_profile() {
        let repo = setup_test().await;

        repo.upsert_profile("u1", &sample_user()).await.expect("Failed to store profile");

        let profile = repo.get_profile("u1").await.expect("Failed to query profile").unwrap();
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.first_name.as_deref(), Some("Ana"));
        assert_eq!(profile.last_name.as_deref(), Some("Silva"));
        assert_eq!(profile.email.as_deref(), Some("ana@example.com"));
        assert_eq!(profile.phone.as_deref(), Some("555-0101"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_profile() {
        let repo = setup_test().await;

        repo.upsert_profile("u1", &sample_user()).await.expect("Failed to store profile");

        let updated = User {
            phone: None,
            ..sample_user()
        };
        repo.upsert_profile("u1", &updated).await.expect("Failed to update profile");

        let profile = repo.get_profile("u1").await.expect("Failed to query profile").unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Ana"));
        assert!(profile.phone.is_none());
    }
}

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::parent::Parent;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::sqlite::repositories::email_conflict;
use crate::backend::storage::traits::ParentStorage;

/// Repository for parent accounts
#[derive(Clone)]
pub struct ParentRepository {
    db: DbConnection,
}

impl ParentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Parent> {
        Ok(Parent {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ParentStorage for ParentRepository {
    async fn store_parent(&self, parent: &Parent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO parents (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&parent.id)
        .bind(&parent.name)
        .bind(&parent.email)
        .bind(&parent.password_hash)
        .bind(&parent.created_at)
        .execute(self.db.pool())
        .await
        .map_err(email_conflict)?;
        Ok(())
    }

    async fn get_parent(&self, parent_id: &str) -> Result<Option<Parent>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM parents
            WHERE id = ?
            "#,
        )
        .bind(parent_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_parent_by_email(&self, email: &str) -> Result<Option<Parent>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM parents
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::sqlite::repositories::fixtures;
    use crate::backend::storage::traits::DuplicateEmail;

    async fn setup_test() -> ParentRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ParentRepository::new(db)
    }

    #[tokio::test]
    async fn test_store_and_find_parent() {
        let repo = setup_test().await;
        let parent = fixtures::parent("p1");

        repo.store_parent(&parent).await.expect("Failed to store parent");

        let by_id = repo.get_parent("p1").await.unwrap();
        assert_eq!(by_id, Some(parent.clone()));

        let by_email = repo.find_parent_by_email("p1@example.com").await.unwrap();
        assert_eq!(by_email.map(|p| p.id), Some("p1".to_string()));

        assert!(repo.get_parent("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = setup_test().await;
        repo.store_parent(&fixtures::parent("p1")).await.unwrap();

        let mut twin = fixtures::parent("p2");
        twin.email = "p1@example.com".to_string();
        let err = repo.store_parent(&twin).await.unwrap_err();
        assert!(err.downcast_ref::<DuplicateEmail>().is_some());
    }
}

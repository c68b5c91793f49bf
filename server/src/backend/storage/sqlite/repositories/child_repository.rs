use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::child::Child;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::sqlite::repositories::email_conflict;
use crate::backend::storage::traits::ChildStorage;

const CHILD_COLUMNS: &str = "id, parent_id, name, age, email, gender, interests, password_hash, \
     total_points, redeemed_points, created_at, updated_at";

/// Repository for child accounts and their point counters
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Child> {
        // Interests are kept as a JSON array in a TEXT column
        let interests: String = row.try_get("interests")?;

        Ok(Child {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            email: row.try_get("email")?,
            gender: row.try_get("gender")?,
            interests: serde_json::from_str(&interests)?,
            password_hash: row.try_get("password_hash")?,
            total_points: row.try_get("total_points")?,
            redeemed_points: row.try_get("redeemed_points")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl ChildStorage for ChildRepository {
    async fn store_child(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO children (id, parent_id, name, age, email, gender, interests,
                                  password_hash, total_points, redeemed_points,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&child.id)
        .bind(&child.parent_id)
        .bind(&child.name)
        .bind(child.age)
        .bind(&child.email)
        .bind(&child.gender)
        .bind(serde_json::to_string(&child.interests)?)
        .bind(&child.password_hash)
        .bind(child.total_points)
        .bind(child.redeemed_points)
        .bind(&child.created_at)
        .bind(&child.updated_at)
        .execute(self.db.pool())
        .await
        .map_err(email_conflict)?;
        Ok(())
    }

    async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let row = sqlx::query(&format!("SELECT {} FROM children WHERE id = ?", CHILD_COLUMNS))
            .bind(child_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_child_by_email(&self, email: &str) -> Result<Option<Child>> {
        let row = sqlx::query(&format!("SELECT {} FROM children WHERE email = ?", CHILD_COLUMNS))
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_children_for_parent(&self, parent_id: &str) -> Result<Vec<Child>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM children WHERE parent_id = ? ORDER BY name ASC",
            CHILD_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_child_profile(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE children
            SET name = ?, age = ?, email = ?, gender = ?, interests = ?,
                password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&child.name)
        .bind(child.age)
        .bind(&child.email)
        .bind(&child.gender)
        .bind(serde_json::to_string(&child.interests)?)
        .bind(&child.password_hash)
        .bind(&child.updated_at)
        .bind(&child.id)
        .execute(self.db.pool())
        .await
        .map_err(email_conflict)?;
        Ok(())
    }

    async fn delete_child(&self, child_id: &str) -> Result<bool> {
        // Tasks and wishes go with the child via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(child_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::task::TaskStatus;
    use crate::backend::storage::sqlite::repositories::{fixtures, ParentRepository, TaskRepository};
    use crate::backend::storage::traits::{DuplicateEmail, ParentStorage, TaskStorage};

    async fn setup_test() -> (DbConnection, ChildRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ParentRepository::new(db.clone())
            .store_parent(&fixtures::parent("p1"))
            .await
            .expect("Failed to seed parent");
        (db.clone(), ChildRepository::new(db))
    }

    #[tokio::test]
    async fn test_store_and_get_child() {
        let (_db, repo) = setup_test().await;
        let child = fixtures::child("c1", "p1", 40, 10);

        repo.store_child(&child).await.expect("Failed to store child");

        let stored = repo.get_child("c1").await.unwrap().expect("child should exist");
        assert_eq!(stored, child);
        assert_eq!(stored.interests, vec!["lego".to_string()]);

        let by_email = repo.find_child_by_email("c1@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_list_children_is_scoped_and_ordered() {
        let (db, repo) = setup_test().await;
        ParentRepository::new(db).store_parent(&fixtures::parent("p2")).await.unwrap();

        let mut zed = fixtures::child("c1", "p1", 0, 0);
        zed.name = "Zed".to_string();
        let mut amy = fixtures::child("c2", "p1", 0, 0);
        amy.name = "Amy".to_string();
        repo.store_child(&zed).await.unwrap();
        repo.store_child(&amy).await.unwrap();
        repo.store_child(&fixtures::child("c3", "p2", 0, 0)).await.unwrap();

        let names: Vec<String> = repo
            .list_children_for_parent("p1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Amy".to_string(), "Zed".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_update_leaves_points_alone() {
        let (_db, repo) = setup_test().await;
        repo.store_child(&fixtures::child("c1", "p1", 40, 10)).await.unwrap();

        let mut edited = fixtures::child("c1", "p1", 999, 999);
        edited.name = "Renamed".to_string();
        edited.age = 11;
        repo.update_child_profile(&edited).await.unwrap();

        let stored = repo.get_child("c1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.age, 11);
        assert_eq!(stored.total_points, 40);
        assert_eq!(stored.redeemed_points, 10);
    }

    #[tokio::test]
    async fn test_taken_email_surfaces_as_duplicate() {
        let (_db, repo) = setup_test().await;
        repo.store_child(&fixtures::child("c1", "p1", 0, 0)).await.unwrap();
        repo.store_child(&fixtures::child("c2", "p1", 0, 0)).await.unwrap();

        let mut twin = fixtures::child("c3", "p1", 0, 0);
        twin.email = "c1@example.com".to_string();
        let err = repo.store_child(&twin).await.unwrap_err();
        assert!(err.downcast_ref::<DuplicateEmail>().is_some());

        let mut moved = fixtures::child("c2", "p1", 0, 0);
        moved.email = "c1@example.com".to_string();
        let err = repo.update_child_profile(&moved).await.unwrap_err();
        assert!(err.downcast_ref::<DuplicateEmail>().is_some());

        // Other failures keep their own type
        let orphan = fixtures::child("c4", "missing", 0, 0);
        let err = repo.store_child(&orphan).await.unwrap_err();
        assert!(err.downcast_ref::<DuplicateEmail>().is_none());
    }

    #[tokio::test]
    async fn test_delete_child_cascades_to_tasks() {
        let (db, repo) = setup_test().await;
        let tasks = TaskRepository::new(db);
        repo.store_child(&fixtures::child("c1", "p1", 0, 0)).await.unwrap();
        tasks
            .store_task(&fixtures::task("t1", "p1", "c1", 10, TaskStatus::Pending))
            .await
            .unwrap();

        assert!(repo.delete_child("c1").await.unwrap());
        assert!(!repo.delete_child("c1").await.unwrap());
        assert!(tasks.get_task("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redeemed_can_never_exceed_total() {
        let (_db, repo) = setup_test().await;
        // The CHECK constraint backs up the ledger guards
        assert!(repo.store_child(&fixtures::child("c1", "p1", 5, 10)).await.is_err());
    }
}

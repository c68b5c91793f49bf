use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::wish::{Wish, WishStatus};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::{LedgerOutcome, WishStorage, WishTransition};

const WISH_COLUMNS: &str = "id, parent_id, child_id, title, description, category, \
     points_required, status, created_at, updated_at, requested_at, approved_at, rejected_at, \
     rejection_reason, redeemed_at";

/// Repository for wishes
#[derive(Clone)]
pub struct WishRepository {
    db: DbConnection,
}

impl WishRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Wish> {
        let status: String = row.try_get("status")?;

        Ok(Wish {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            child_id: row.try_get("child_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            points_required: row.try_get("points_required")?,
            status: status.parse()?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            requested_at: row.try_get("requested_at")?,
            approved_at: row.try_get("approved_at")?,
            rejected_at: row.try_get("rejected_at")?,
            rejection_reason: row.try_get("rejection_reason")?,
            redeemed_at: row.try_get("redeemed_at")?,
        })
    }

    fn timestamp_column(status: WishStatus) -> Option<&'static str> {
        match status {
            WishStatus::PendingApproval => Some("requested_at"),
            WishStatus::Approved => Some("approved_at"),
            WishStatus::Rejected => Some("rejected_at"),
            WishStatus::Redeemed => Some("redeemed_at"),
            WishStatus::Available => None,
        }
    }
}

#[async_trait]
impl WishStorage for WishRepository {
    async fn store_wish(&self, wish: &Wish) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO wishes ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            WISH_COLUMNS
        ))
        .bind(&wish.id)
        .bind(&wish.parent_id)
        .bind(&wish.child_id)
        .bind(&wish.title)
        .bind(&wish.description)
        .bind(&wish.category)
        .bind(wish.points_required)
        .bind(wish.status.as_str())
        .bind(&wish.created_at)
        .bind(&wish.updated_at)
        .bind(&wish.requested_at)
        .bind(&wish.approved_at)
        .bind(&wish.rejected_at)
        .bind(&wish.rejection_reason)
        .bind(&wish.redeemed_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_wish(&self, wish_id: &str) -> Result<Option<Wish>> {
        let row = sqlx::query(&format!("SELECT {} FROM wishes WHERE id = ?", WISH_COLUMNS))
            .bind(wish_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_wishes_for_child(&self, child_id: &str) -> Result<Vec<Wish>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM wishes WHERE child_id = ? ORDER BY created_at DESC, ROWID DESC",
            WISH_COLUMNS
        ))
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_wishes_for_parent(&self, parent_id: &str) -> Result<Vec<Wish>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM wishes WHERE parent_id = ? ORDER BY created_at DESC, ROWID DESC",
            WISH_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_wish_details(&self, wish: &Wish) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE wishes
            SET title = ?, description = ?, category = ?, points_required = ?, updated_at = ?
            WHERE id = ? AND status = 'available'
            "#,
        )
        .bind(&wish.title)
        .bind(&wish.description)
        .bind(&wish.category)
        .bind(wish.points_required)
        .bind(&wish.updated_at)
        .bind(&wish.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_wish(&self, wish_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wishes WHERE id = ?")
            .bind(wish_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_wish(&self, transition: &WishTransition<'_>) -> Result<LedgerOutcome> {
        let mut sql = String::from("UPDATE wishes SET status = ?, updated_at = ?");
        if let Some(column) = Self::timestamp_column(transition.to) {
            sql.push_str(&format!(", {} = ?", column));
        }
        if transition.to == WishStatus::Rejected {
            sql.push_str(", rejection_reason = ?");
        }
        sql.push_str(" WHERE id = ? AND status = ?");

        let mut query = sqlx::query(&sql).bind(transition.to.as_str()).bind(transition.at);
        if Self::timestamp_column(transition.to).is_some() {
            query = query.bind(transition.at);
        }
        if transition.to == WishStatus::Rejected {
            query = query.bind(transition.rejection_reason);
        }
        query = query.bind(transition.wish_id).bind(transition.from.as_str());

        let mut tx = self.db.pool().begin().await?;

        let updated = query.execute(&mut *tx).await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(LedgerOutcome::StatusConflict);
        }

        if let Some(points) = transition.spend {
            // Balance is re-checked under the write lock
            let debited = sqlx::query(
                r#"
                UPDATE children
                SET redeemed_points = redeemed_points + ?, updated_at = ?
                WHERE id = (SELECT child_id FROM wishes WHERE id = ?)
                  AND total_points - redeemed_points >= ?
                "#,
            )
            .bind(points)
            .bind(transition.at)
            .bind(transition.wish_id)
            .bind(points)
            .execute(&mut *tx)
            .await?;

            if debited.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(LedgerOutcome::InsufficientPoints);
            }
        }

        tx.commit().await?;
        Ok(LedgerOutcome::Applied)
    }
}

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::reward::{Reward, RewardStatus};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::{LedgerOutcome, RewardStorage};

/// Repository for the parent-defined reward catalog
#[derive(Clone)]
pub struct RewardRepository {
    db: DbConnection,
}

impl RewardRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Reward> {
        let status: String = row.try_get("status")?;

        Ok(Reward {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            reward_name: row.try_get("reward_name")?,
            points: row.try_get("points")?,
            status: status.parse()?,
            redeemed_by: row.try_get("redeemed_by")?,
            redeemed_at: row.try_get("redeemed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl RewardStorage for RewardRepository {
    async fn store_reward(&self, reward: &Reward) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rewards (id, parent_id, reward_name, points, status,
                                 redeemed_by, redeemed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reward.id)
        .bind(&reward.parent_id)
        .bind(&reward.reward_name)
        .bind(reward.points)
        .bind(reward.status.as_str())
        .bind(&reward.redeemed_by)
        .bind(&reward.redeemed_at)
        .bind(&reward.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_reward(&self, reward_id: &str) -> Result<Option<Reward>> {
        let row = sqlx::query(
            r#"
            SELECT id, parent_id, reward_name, points, status, redeemed_by, redeemed_at, created_at
            FROM rewards
            WHERE id = ?
            "#,
        )
        .bind(reward_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_rewards_for_parent(&self, parent_id: &str) -> Result<Vec<Reward>> {
        let rows = sqlx::query(
            r#"
            SELECT id, parent_id, reward_name, points, status, redeemed_by, redeemed_at, created_at
            FROM rewards
            WHERE parent_id = ?
            ORDER BY created_at DESC, ROWID DESC
            "#,
        )
        .bind(parent_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn delete_reward(&self, reward_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rewards WHERE id = ?")
            .bind(reward_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn redeem_reward(
        &self,
        reward_id: &str,
        child_id: &str,
        points: u32,
        at: &str,
    ) -> Result<LedgerOutcome> {
        let mut tx = self.db.pool().begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE rewards
            SET status = ?, redeemed_by = ?, redeemed_at = ?
            WHERE id = ? AND status != ?
            "#,
        )
        .bind(RewardStatus::Redeemed.as_str())
        .bind(child_id)
        .bind(at)
        .bind(reward_id)
        .bind(RewardStatus::Redeemed.as_str())
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(LedgerOutcome::StatusConflict);
        }

        let debited = sqlx::query(
            r#"
            UPDATE children
            SET redeemed_points = redeemed_points + ?, updated_at = ?
            WHERE id = ? AND total_points - redeemed_points >= ?
            "#,
        )
        .bind(points)
        .bind(at)
        .bind(child_id)
        .bind(points)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(LedgerOutcome::InsufficientPoints);
        }

        tx.commit().await?;
        Ok(LedgerOutcome::Applied)
    }
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::domain::models::task::{Task, TaskStatus};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::{TaskStorage, TaskTransition};

const TASK_COLUMNS: &str = "id, parent_id, child_id, wish_id, title, description, category, \
     points_awarded, due_date, estimated_duration, status, created_at, updated_at, sent_at, \
     approved_at, rejected_at, rejection_reason, completed_at";

/// Repository for tasks
#[derive(Clone)]
pub struct TaskRepository {
    db: DbConnection,
}

impl TaskRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn map_row(row: &SqliteRow) -> Result<Task> {
        let status: String = row.try_get("status")?;

        Ok(Task {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            child_id: row.try_get("child_id")?,
            wish_id: row.try_get("wish_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            points_awarded: row.try_get("points_awarded")?,
            due_date: row.try_get("due_date")?,
            estimated_duration: row.try_get("estimated_duration")?,
            status: status.parse()?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            sent_at: row.try_get("sent_at")?,
            approved_at: row.try_get("approved_at")?,
            rejected_at: row.try_get("rejected_at")?,
            rejection_reason: row.try_get("rejection_reason")?,
            completed_at: row.try_get("completed_at")?,
        })
    }

    /// Column stamped when a task enters `status`
    fn timestamp_column(status: TaskStatus) -> Option<&'static str> {
        match status {
            TaskStatus::Sent => Some("sent_at"),
            TaskStatus::Approved => Some("approved_at"),
            TaskStatus::Rejected => Some("rejected_at"),
            TaskStatus::Completed => Some("completed_at"),
            TaskStatus::Pending | TaskStatus::PendingApproval => None,
        }
    }

    fn transition_sql(transition: &TaskTransition<'_>) -> String {
        let mut sql = String::from("UPDATE tasks SET status = ?, updated_at = ?");
        if let Some(column) = Self::timestamp_column(transition.to) {
            sql.push_str(&format!(", {} = ?", column));
        }
        if transition.to == TaskStatus::Rejected {
            sql.push_str(", rejection_reason = ?");
        }
        let placeholders = vec!["?"; transition.from.len()].join(", ");
        sql.push_str(&format!(" WHERE id = ? AND status IN ({})", placeholders));
        sql
    }
}

#[async_trait]
impl TaskStorage for TaskRepository {
    async fn store_task(&self, task: &Task) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TASK_COLUMNS
        ))
        .bind(&task.id)
        .bind(&task.parent_id)
        .bind(&task.child_id)
        .bind(&task.wish_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.category)
        .bind(task.points_awarded)
        .bind(&task.due_date)
        .bind(task.estimated_duration)
        .bind(task.status.as_str())
        .bind(&task.created_at)
        .bind(&task.updated_at)
        .bind(&task.sent_at)
        .bind(&task.approved_at)
        .bind(&task.rejected_at)
        .bind(&task.rejection_reason)
        .bind(&task.completed_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
            .bind(task_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_tasks_for_child(&self, child_id: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE child_id = ? ORDER BY created_at DESC, ROWID DESC",
            TASK_COLUMNS
        ))
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_tasks_for_parent(&self, parent_id: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE parent_id = ? ORDER BY created_at DESC, ROWID DESC",
            TASK_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_task_details(&self, task: &Task) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, category = ?, points_awarded = ?,
                due_date = ?, estimated_duration = ?, updated_at = ?
            WHERE id = ? AND status != 'completed'
              AND (points_awarded = ? OR status NOT IN ('approved', 'rejected'))
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.category)
        .bind(task.points_awarded)
        .bind(&task.due_date)
        .bind(task.estimated_duration)
        .bind(&task.updated_at)
        .bind(&task.id)
        .bind(task.points_awarded)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, task_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_task(&self, transition: &TaskTransition<'_>) -> Result<bool> {
        if transition.from.is_empty() {
            return Ok(false);
        }

        let sql = Self::transition_sql(transition);
        let mut query = sqlx::query(&sql).bind(transition.to.as_str()).bind(transition.at);
        if Self::timestamp_column(transition.to).is_some() {
            query = query.bind(transition.at);
        }
        if transition.to == TaskStatus::Rejected {
            query = query.bind(transition.rejection_reason);
        }
        query = query.bind(transition.task_id);
        for status in transition.from {
            query = query.bind(status.as_str());
        }

        let mut tx = self.db.pool().begin().await?;

        // The status guard and the award commit together or not at all
        let updated = query.execute(&mut *tx).await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(points) = transition.award {
            let credited = sqlx::query(
                r#"
                UPDATE children
                SET total_points = total_points + ?, updated_at = ?
                WHERE id = (SELECT child_id FROM tasks WHERE id = ?)
                "#,
            )
            .bind(points)
            .bind(transition.at)
            .bind(transition.task_id)
            .execute(&mut *tx)
            .await?;

            if credited.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(anyhow!("Task {} has no child to credit", transition.task_id));
            }
        }

        tx.commit().await?;
        Ok(true)
    }
}

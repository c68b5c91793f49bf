//! Task lifecycle.
//!
//! Parents create and manage tasks for their children; a child sends a
//! finished task back; the parent reviews, approves or rejects it. Every
//! status change is a guarded conditional update in storage, so of two
//! racing callers only one wins and the other sees `InvalidTransition`.
//! Approval credits `points_awarded` to the child in the same transaction.

use chrono::Utc;
use shared::{Role, SyncTopic};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::domain::child_service::ChildService;
use crate::backend::domain::commands::tasks::{
    CreateTaskCommand, CreateTaskFromWishCommand, EditTaskCommand, TaskStatusCommand,
    UpdateTaskCommand,
};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::{
    session::Session,
    task::{Task, TaskAction, TaskStatus},
};
use crate::backend::domain::sync::SyncHub;
use crate::backend::domain::validation;
use crate::backend::storage::{TaskStorage, TaskTransition, WishStorage};

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStorage>,
    wishes: Arc<dyn WishStorage>,
    child_service: ChildService,
    sync: SyncHub,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStorage>,
        wishes: Arc<dyn WishStorage>,
        child_service: ChildService,
        sync: SyncHub,
    ) -> Self {
        Self {
            tasks,
            wishes,
            child_service,
            sync,
        }
    }

    async fn load(&self, task_id: &str) -> DomainResult<Task> {
        self.tasks
            .get_task(task_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Task"))
    }

    /// Load a task owned by the session's parent
    async fn load_owned(&self, session: &Session, task_id: &str) -> DomainResult<Task> {
        let parent_id = session.require_parent()?;
        let task = self.load(task_id).await?;
        if task.parent_id != parent_id {
            return Err(DomainError::forbidden("You do not have access to this task"));
        }
        Ok(task)
    }

    fn validate_points(points: u32) -> DomainResult<u32> {
        validation::points_in_range(points, "Points", Task::MIN_POINTS, Task::MAX_POINTS)
    }

    pub async fn create(&self, session: &Session, command: CreateTaskCommand) -> DomainResult<Task> {
        self.insert(session, command, None).await
    }

    async fn insert(
        &self,
        session: &Session,
        command: CreateTaskCommand,
        wish_id: Option<String>,
    ) -> DomainResult<Task> {
        let child = self.child_service.authorize_parent(session, &command.child_id).await?;
        info!("Creating task for child {}", child.id);

        let title = validation::required_text(&command.title, "Title", Task::MAX_TITLE_LEN)?;
        let points_awarded = Self::validate_points(command.points_awarded)?;
        let description = validation::optional_text(
            command.description.as_deref(),
            "Description",
            Task::MAX_DESCRIPTION_LEN,
        )?;
        let category = validation::optional_text(command.category.as_deref(), "Category", 50)?;

        let now = Utc::now().to_rfc3339();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            parent_id: child.parent_id.clone(),
            child_id: child.id,
            wish_id,
            title,
            description,
            category,
            points_awarded,
            due_date: command.due_date,
            estimated_duration: command.estimated_duration,
            status: TaskStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
            sent_at: None,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            completed_at: None,
        };

        self.tasks.store_task(&task).await?;
        info!("Created task {} '{}'", task.id, task.title);
        self.sync.publish(&task.parent_id, SyncTopic::Tasks);

        Ok(task)
    }

    /// Turn a wish into a pending task for the wish's child
    pub async fn create_from_wish(
        &self,
        session: &Session,
        command: CreateTaskFromWishCommand,
    ) -> DomainResult<Task> {
        let parent_id = session.require_parent()?;
        let wish = self
            .wishes
            .get_wish(&command.wish_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Wish"))?;
        if wish.parent_id != parent_id {
            return Err(DomainError::forbidden("You do not have access to this wish"));
        }

        self.insert(
            session,
            CreateTaskCommand {
                child_id: wish.child_id.clone(),
                title: wish.title.clone(),
                description: wish.description.clone(),
                category: wish.category.clone(),
                points_awarded: command.points_awarded,
                due_date: command.due_date,
                estimated_duration: None,
            },
            Some(wish.id),
        )
        .await
    }

    pub async fn list_for_child(&self, session: &Session, child_id: &str) -> DomainResult<Vec<Task>> {
        self.child_service.authorize_access(session, child_id).await?;
        Ok(self.tasks.list_tasks_for_child(child_id).await?)
    }

    pub async fn list_for_parent(&self, session: &Session, parent_id: &str) -> DomainResult<Vec<Task>> {
        if session.require_parent()? != parent_id {
            return Err(DomainError::forbidden("You can only list your own tasks"));
        }
        Ok(self.tasks.list_tasks_for_parent(parent_id).await?)
    }

    /// Apply field edits. Completed tasks are frozen.
    pub async fn edit(&self, session: &Session, task_id: &str, command: EditTaskCommand) -> DomainResult<Task> {
        let mut task = self.load_owned(session, task_id).await?;
        info!("Editing task {}", task_id);

        if !task.status.is_editable() {
            return Err(DomainError::Conflict("Completed tasks can no longer be edited".to_string()));
        }

        if let Some(title) = command.title {
            task.title = validation::required_text(&title, "Title", Task::MAX_TITLE_LEN)?;
        }
        if let Some(description) = command.description {
            task.description =
                validation::optional_text(Some(&description), "Description", Task::MAX_DESCRIPTION_LEN)?;
        }
        if let Some(category) = command.category {
            task.category = validation::optional_text(Some(&category), "Category", 50)?;
        }
        if let Some(points) = command.points_awarded {
            let points = Self::validate_points(points)?;
            if points != task.points_awarded && task.status.points_settled() {
                return Err(DomainError::Conflict(format!(
                    "Points of a {} task can no longer change",
                    task.status
                )));
            }
            task.points_awarded = points;
        }
        if let Some(due_date) = command.due_date {
            task.due_date = Some(due_date).filter(|d| !d.trim().is_empty());
        }
        if let Some(duration) = command.estimated_duration {
            task.estimated_duration = Some(duration);
        }
        task.updated_at = Utc::now().to_rfc3339();

        if !self.tasks.update_task_details(&task).await? {
            return Err(DomainError::Conflict("Task was settled while editing".to_string()));
        }
        self.sync.publish(&task.parent_id, SyncTopic::Tasks);
        self.load(task_id).await
    }

    pub async fn delete(&self, session: &Session, task_id: &str) -> DomainResult<()> {
        let task = self.load_owned(session, task_id).await?;
        info!("Deleting task {}", task_id);

        if !self.tasks.delete_task(task_id).await? {
            return Err(DomainError::not_found("Task"));
        }
        self.sync.publish(&task.parent_id, SyncTopic::Tasks);
        Ok(())
    }

    /// Resolve and check a requested status change against the task as
    /// loaded: the edge, the actor and the rejection reason. Writes nothing.
    fn plan_transition(
        &self,
        session: &Session,
        task: &Task,
        command: &TaskStatusCommand,
    ) -> DomainResult<(TaskAction, Option<String>)> {
        let target = command.status;
        let action = TaskAction::for_target(target)
            .ok_or_else(|| DomainError::invalid_transition(task.status, target))?;

        self.authorize_actor(session, task, action)?;

        if !action.allows_from(task.status) {
            return Err(DomainError::invalid_transition(task.status, target));
        }

        let rejection_reason = match action {
            TaskAction::Reject => Some(
                validation::optional_text(
                    command.rejection_reason.as_deref(),
                    "Rejection reason",
                    validation::MAX_REASON_LEN,
                )?
                .ok_or_else(|| DomainError::validation("A rejection reason is required"))?,
            ),
            _ => None,
        };
        Ok((action, rejection_reason))
    }

    /// Move a task along one lifecycle edge
    pub async fn transition(
        &self,
        session: &Session,
        task_id: &str,
        command: TaskStatusCommand,
    ) -> DomainResult<Task> {
        let task = self.load(task_id).await?;
        let target = command.status;
        let (action, rejection_reason) = self.plan_transition(session, &task, &command)?;
        let award = match action {
            TaskAction::Approve => Some(task.points_awarded),
            _ => None,
        };

        let at = Utc::now().to_rfc3339();
        let applied = self
            .tasks
            .transition_task(&TaskTransition {
                task_id,
                from: action.sources(),
                to: target,
                at: &at,
                rejection_reason: rejection_reason.as_deref(),
                award,
            })
            .await?;

        if !applied {
            // Lost a race; report the state that won
            let current = self.load(task_id).await?;
            warn!(
                "Task {} moved to {} before {} could apply",
                task_id, current.status, target
            );
            return Err(DomainError::invalid_transition(current.status, target));
        }

        info!("Task {} {} -> {}", task_id, task.status, target);
        self.sync.publish(&task.parent_id, SyncTopic::Tasks);
        if award.is_some() {
            self.sync.publish(&task.parent_id, SyncTopic::Children);
        }

        self.load(task_id).await
    }

    /// Combined update: field edits first, then a status change if the
    /// requested status differs from the current one. An illegal status
    /// change is refused before any edit is written.
    pub async fn update(&self, session: &Session, task_id: &str, command: UpdateTaskCommand) -> DomainResult<Task> {
        let current = self.load(task_id).await?;
        let status = command.status.filter(|status| status.status != current.status);
        if let Some(status) = &status {
            self.plan_transition(session, &current, status)?;
        }

        let mut task = if command.edit.is_empty() {
            self.child_service.authorize_access(session, &current.child_id).await?;
            current
        } else {
            self.edit(session, task_id, command.edit).await?
        };

        if let Some(status) = status {
            task = self.transition(session, task_id, status).await?;
        }
        Ok(task)
    }

    fn authorize_actor(&self, session: &Session, task: &Task, action: TaskAction) -> DomainResult<()> {
        let allowed = match action.actor() {
            Role::Child => session.require_child()? == task.child_id,
            Role::Parent => session.require_parent()? == task.parent_id,
        };
        if allowed {
            Ok(())
        } else {
            Err(DomainError::forbidden("You do not have access to this task"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::ledger::available_points;
    use crate::backend::test_support::Harness;

    fn new_task(points: u32) -> CreateTaskCommand {
        CreateTaskCommand {
            child_id: "c1".to_string(),
            title: "Clean room".to_string(),
            description: Some("Including under the bed".to_string()),
            category: Some("chores".to_string()),
            points_awarded: points,
            due_date: None,
            estimated_duration: Some(30),
        }
    }

    fn to(status: TaskStatus) -> TaskStatusCommand {
        TaskStatusCommand {
            status,
            rejection_reason: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_and_starts_pending() {
        let h = Harness::new().await;

        let task = h.tasks.create(&h.parent, new_task(20)).await.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.parent_id, "p1");

        for points in [0, 101] {
            assert!(matches!(
                h.tasks.create(&h.parent, new_task(points)).await,
                Err(DomainError::Validation(_))
            ));
        }

        let mut blank = new_task(10);
        blank.title = "  ".to_string();
        assert!(matches!(h.tasks.create(&h.parent, blank).await, Err(DomainError::Validation(_))));

        // Another family's child
        let mut foreign = new_task(10);
        foreign.child_id = "c2".to_string();
        assert!(matches!(h.tasks.create(&h.parent, foreign).await, Err(DomainError::Forbidden(_))));

        assert!(matches!(h.tasks.create(&h.child, new_task(10)).await, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_send_then_approve_awards_points() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(20)).await.unwrap();

        let sent = h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        assert_eq!(sent.status, TaskStatus::Sent);
        assert!(sent.sent_at.is_some());

        let approved = h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await.unwrap();
        assert_eq!(approved.status, TaskStatus::Approved);
        assert!(approved.approved_at.is_some());

        assert_eq!(available_points(&h.child_record("c1").await), 20);
    }

    #[tokio::test]
    async fn test_reapproval_does_not_double_count() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(15)).await.unwrap();
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await.unwrap();

        let again = h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await;
        assert!(matches!(again, Err(DomainError::InvalidTransition { .. })));
        assert_eq!(h.child_record("c1").await.total_points, 15);
    }

    #[tokio::test]
    async fn test_concurrent_approvals_credit_once() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(25)).await.unwrap();
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();

        let (a, b) = tokio::join!(
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)),
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved))
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::InvalidTransition { .. }))));
        assert_eq!(h.child_record("c1").await.total_points, 25);
    }

    #[tokio::test]
    async fn test_illegal_edges_and_actors() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();

        // Not sent yet
        assert!(matches!(
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await,
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(matches!(
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Completed)).await,
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(matches!(
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Pending)).await,
            Err(DomainError::InvalidTransition { .. })
        ));

        // Only the assigned child sends, only the owning parent approves
        assert!(matches!(
            h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Sent)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            h.tasks.transition(&h.other_child, &task.id, to(TaskStatus::Sent)).await,
            Err(DomainError::Forbidden(_))
        ));
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        assert!(matches!(
            h.tasks.transition(&h.child, &task.id, to(TaskStatus::Approved)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            h.tasks.transition(&h.other_parent, &task.id, to(TaskStatus::Approved)).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_requires_reason_and_records_timestamp() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        h.tasks
            .transition(&h.parent, &task.id, to(TaskStatus::PendingApproval))
            .await
            .unwrap();

        let missing = TaskStatusCommand {
            status: TaskStatus::Rejected,
            rejection_reason: Some("   ".to_string()),
        };
        assert!(matches!(
            h.tasks.transition(&h.parent, &task.id, missing).await,
            Err(DomainError::Validation(_))
        ));

        let rejected = h
            .tasks
            .transition(
                &h.parent,
                &task.id,
                TaskStatusCommand {
                    status: TaskStatus::Rejected,
                    rejection_reason: Some("Bed not made".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, TaskStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Bed not made"));
        assert!(rejected.rejected_at.is_some());
        assert_eq!(h.child_record("c1").await.total_points, 0);
    }

    #[tokio::test]
    async fn test_complete_freezes_edits_but_not_delete() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await.unwrap();

        let edited = h
            .tasks
            .edit(
                &h.parent,
                &task.id,
                EditTaskCommand {
                    title: Some("Clean room twice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "Clean room twice");
        assert_eq!(edited.status, TaskStatus::Approved);

        let completed = h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Completed)).await.unwrap();
        assert!(completed.completed_at.is_some());
        // Completion has no ledger effect
        assert_eq!(h.child_record("c1").await.total_points, 10);

        assert!(matches!(
            h.tasks
                .edit(&h.parent, &task.id, EditTaskCommand { points_awarded: Some(50), ..Default::default() })
                .await,
            Err(DomainError::Conflict(_))
        ));

        h.tasks.delete(&h.parent, &task.id).await.unwrap();
        assert!(h.tasks.list_for_child(&h.child, "c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_dispatches_status_changes() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();

        // Same status is not a transition
        let unchanged = h
            .tasks
            .update(
                &h.child,
                &task.id,
                UpdateTaskCommand {
                    status: Some(to(TaskStatus::Pending)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unchanged.status, TaskStatus::Pending);

        let sent = h
            .tasks
            .update(
                &h.child,
                &task.id,
                UpdateTaskCommand {
                    status: Some(to(TaskStatus::Sent)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(sent.status, TaskStatus::Sent);

        assert!(matches!(
            h.tasks.update(&h.other_child, &task.id, UpdateTaskCommand::default()).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_status_change_leaves_edits_unwritten() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();

        // pending cannot jump to pending_approval
        let result = h
            .tasks
            .update(
                &h.parent,
                &task.id,
                UpdateTaskCommand {
                    edit: EditTaskCommand {
                        title: Some("Renamed".to_string()),
                        points_awarded: Some(90),
                        ..Default::default()
                    },
                    status: Some(to(TaskStatus::PendingApproval)),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

        let stored = h.tasks.list_for_child(&h.child, "c1").await.unwrap().remove(0);
        assert_eq!(stored.title, "Clean room");
        assert_eq!(stored.points_awarded, 10);
        assert_eq!(stored.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_points_are_frozen_after_approval() {
        let h = Harness::new().await;
        let task = h.tasks.create(&h.parent, new_task(20)).await.unwrap();
        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        h.tasks.transition(&h.parent, &task.id, to(TaskStatus::Approved)).await.unwrap();

        let raise = EditTaskCommand {
            points_awarded: Some(90),
            ..Default::default()
        };
        assert!(matches!(
            h.tasks.edit(&h.parent, &task.id, raise).await,
            Err(DomainError::Conflict(_))
        ));

        // Restating the credited value is still a valid edit
        let same = EditTaskCommand {
            title: Some("Clean room again".to_string()),
            points_awarded: Some(20),
            ..Default::default()
        };
        let edited = h.tasks.edit(&h.parent, &task.id, same).await.unwrap();
        assert_eq!(edited.points_awarded, 20);
        assert_eq!(h.child_record("c1").await.total_points, 20);
    }

    #[tokio::test]
    async fn test_listing_is_scoped() {
        let h = Harness::new().await;
        h.tasks.create(&h.parent, new_task(10)).await.unwrap();

        assert_eq!(h.tasks.list_for_child(&h.child, "c1").await.unwrap().len(), 1);
        assert_eq!(h.tasks.list_for_parent(&h.parent, "p1").await.unwrap().len(), 1);
        assert!(matches!(h.tasks.list_for_child(&h.other_child, "c1").await, Err(DomainError::Forbidden(_))));
        assert!(matches!(
            h.tasks.list_for_parent(&h.other_parent, "p1").await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_create_from_wish_links_wish() {
        let h = Harness::new().await;
        let wish = h
            .wishes
            .create(
                &h.child,
                crate::backend::domain::commands::wishes::CreateWishCommand {
                    child_id: None,
                    title: "New bike".to_string(),
                    description: None,
                    category: Some("toys".to_string()),
                    points_required: 200,
                },
            )
            .await
            .unwrap();

        let task = h
            .tasks
            .create_from_wish(
                &h.parent,
                CreateTaskFromWishCommand {
                    wish_id: wish.id.clone(),
                    points_awarded: 50,
                    due_date: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(task.wish_id.as_deref(), Some(wish.id.as_str()));
        assert_eq!(task.title, "New bike");
        assert_eq!(task.child_id, "c1");
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(matches!(
            h.tasks
                .create_from_wish(
                    &h.other_parent,
                    CreateTaskFromWishCommand {
                        wish_id: wish.id,
                        points_awarded: 50,
                        due_date: None,
                    },
                )
                .await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_transitions_publish_sync_signals() {
        let h = Harness::new().await;
        let mut rx = h.sync.subscribe();

        let task = h.tasks.create(&h.parent, new_task(10)).await.unwrap();
        let signal = rx.recv().await.unwrap();
        assert_eq!(signal.topic, shared::SyncTopic::Tasks);
        assert_eq!(signal.family_id, "p1");

        h.tasks.transition(&h.child, &task.id, to(TaskStatus::Sent)).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().topic, shared::SyncTopic::Tasks);
    }
}

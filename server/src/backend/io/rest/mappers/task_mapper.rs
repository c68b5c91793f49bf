use shared::{
    CreateTaskRequest, Task as SharedTask, TaskStatus as SharedTaskStatus, TaskStatusRequest,
    UpdateTaskRequest,
};

use crate::backend::domain::commands::tasks::{
    CreateTaskCommand, EditTaskCommand, TaskStatusCommand, UpdateTaskCommand,
};
use crate::backend::domain::models::task::{Task as DomainTask, TaskStatus};

/// Mapper between task DTOs and domain tasks
pub struct TaskMapper;

impl TaskMapper {
    pub fn status_to_domain(status: SharedTaskStatus) -> TaskStatus {
        match status {
            SharedTaskStatus::Pending => TaskStatus::Pending,
            SharedTaskStatus::Sent => TaskStatus::Sent,
            SharedTaskStatus::PendingApproval => TaskStatus::PendingApproval,
            SharedTaskStatus::Approved => TaskStatus::Approved,
            SharedTaskStatus::Rejected => TaskStatus::Rejected,
            SharedTaskStatus::Completed => TaskStatus::Completed,
        }
    }

    pub fn status_to_dto(status: TaskStatus) -> SharedTaskStatus {
        match status {
            TaskStatus::Pending => SharedTaskStatus::Pending,
            TaskStatus::Sent => SharedTaskStatus::Sent,
            TaskStatus::PendingApproval => SharedTaskStatus::PendingApproval,
            TaskStatus::Approved => SharedTaskStatus::Approved,
            TaskStatus::Rejected => SharedTaskStatus::Rejected,
            TaskStatus::Completed => SharedTaskStatus::Completed,
        }
    }

    pub fn to_dto(domain: DomainTask) -> SharedTask {
        SharedTask {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            category: domain.category,
            points_awarded: domain.points_awarded,
            due_date: domain.due_date,
            estimated_duration: domain.estimated_duration,
            status: Self::status_to_dto(domain.status),
            child_id: domain.child_id,
            parent_id: domain.parent_id,
            wish_id: domain.wish_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            sent_at: domain.sent_at,
            approved_at: domain.approved_at,
            rejected_at: domain.rejected_at,
            rejection_reason: domain.rejection_reason,
            completed_at: domain.completed_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainTask>) -> Vec<SharedTask> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreateTaskRequest) -> CreateTaskCommand {
        CreateTaskCommand {
            child_id: request.child_id,
            title: request.title,
            description: request.description,
            category: request.category,
            points_awarded: request.points_awarded,
            due_date: request.due_date,
            estimated_duration: request.estimated_duration,
        }
    }

    pub fn to_status_command(request: TaskStatusRequest) -> TaskStatusCommand {
        TaskStatusCommand {
            status: Self::status_to_domain(request.status),
            rejection_reason: request.rejection_reason,
        }
    }

    pub fn to_update_command(request: UpdateTaskRequest) -> UpdateTaskCommand {
        UpdateTaskCommand {
            edit: EditTaskCommand {
                title: request.title,
                description: request.description,
                category: request.category,
                points_awarded: request.points_awarded,
                due_date: request.due_date,
                estimated_duration: request.estimated_duration,
            },
            status: request.status.map(|status| TaskStatusCommand {
                status: Self::status_to_domain(status),
                rejection_reason: request.rejection_reason,
            }),
        }
    }
}

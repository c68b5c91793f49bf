//! Domain model for a task and its lifecycle.
//!
//! ```text
//! pending --send--> sent --review--> pending_approval
//!                    |                    |
//!                    +----approve/reject--+--> approved --complete--> completed
//!                                          \-> rejected
//! ```

use shared::Role;
use std::fmt;
use std::str::FromStr;

use super::{normalize_status, UnknownStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Sent,
    PendingApproval,
    Approved,
    Rejected,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Sent => "sent",
            TaskStatus::PendingApproval => "pending_approval",
            TaskStatus::Approved => "approved",
            TaskStatus::Rejected => "rejected",
            TaskStatus::Completed => "completed",
        }
    }

    /// Whether parents may still edit the task's fields
    pub fn is_editable(&self) -> bool {
        *self != TaskStatus::Completed
    }

    /// Whether `points_awarded` is settled: credited, refused or final
    pub fn points_settled(&self) -> bool {
        matches!(
            self,
            TaskStatus::Approved | TaskStatus::Rejected | TaskStatus::Completed
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "sent" => Ok(TaskStatus::Sent),
            "pending_approval" => Ok(TaskStatus::PendingApproval),
            "approved" => Ok(TaskStatus::Approved),
            "rejected" => Ok(TaskStatus::Rejected),
            "completed" | "complete" => Ok(TaskStatus::Completed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A lifecycle edge a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Send,
    Review,
    Approve,
    Reject,
    Complete,
}

impl TaskAction {
    pub fn target(&self) -> TaskStatus {
        match self {
            TaskAction::Send => TaskStatus::Sent,
            TaskAction::Review => TaskStatus::PendingApproval,
            TaskAction::Approve => TaskStatus::Approved,
            TaskAction::Reject => TaskStatus::Rejected,
            TaskAction::Complete => TaskStatus::Completed,
        }
    }

    /// States from which the action is legal
    pub fn sources(&self) -> &'static [TaskStatus] {
        match self {
            TaskAction::Send => &[TaskStatus::Pending],
            TaskAction::Review => &[TaskStatus::Sent],
            TaskAction::Approve | TaskAction::Reject => {
                &[TaskStatus::Sent, TaskStatus::PendingApproval]
            }
            TaskAction::Complete => &[TaskStatus::Approved],
        }
    }

    /// Who may perform the action
    pub fn actor(&self) -> Role {
        match self {
            TaskAction::Send => Role::Child,
            _ => Role::Parent,
        }
    }

    pub fn allows_from(&self, current: TaskStatus) -> bool {
        self.sources().contains(&current)
    }

    /// Resolve a requested target status into the action reaching it.
    /// There is no edge back into `pending`.
    pub fn for_target(status: TaskStatus) -> Option<TaskAction> {
        match status {
            TaskStatus::Pending => None,
            TaskStatus::Sent => Some(TaskAction::Send),
            TaskStatus::PendingApproval => Some(TaskAction::Review),
            TaskStatus::Approved => Some(TaskAction::Approve),
            TaskStatus::Rejected => Some(TaskAction::Reject),
            TaskStatus::Completed => Some(TaskAction::Complete),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub wish_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_awarded: u32,
    pub due_date: Option<String>,
    pub estimated_duration: Option<u32>,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
    pub sent_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub completed_at: Option<String>,
}

impl Task {
    pub const MIN_POINTS: u32 = 1;
    pub const MAX_POINTS: u32 = 100;
    pub const MAX_TITLE_LEN: usize = 100;
    pub const MAX_DESCRIPTION_LEN: usize = 1000;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::Sent,
        TaskStatus::PendingApproval,
        TaskStatus::Approved,
        TaskStatus::Rejected,
        TaskStatus::Completed,
    ];

    #[test]
    fn test_status_parsing_normalizes_legacy_names() {
        assert_eq!("pending-approval".parse::<TaskStatus>().unwrap(), TaskStatus::PendingApproval);
        assert_eq!("PENDING_APPROVAL".parse::<TaskStatus>().unwrap(), TaskStatus::PendingApproval);
        assert_eq!("complete".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("done".parse::<TaskStatus>().is_err());

        for status in ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_only_documented_edges_are_allowed() {
        let mut allowed = Vec::new();
        for action in [
            TaskAction::Send,
            TaskAction::Review,
            TaskAction::Approve,
            TaskAction::Reject,
            TaskAction::Complete,
        ] {
            for from in ALL {
                if action.allows_from(from) {
                    allowed.push((from, action.target()));
                }
            }
        }

        assert_eq!(
            allowed,
            vec![
                (TaskStatus::Pending, TaskStatus::Sent),
                (TaskStatus::Sent, TaskStatus::PendingApproval),
                (TaskStatus::Sent, TaskStatus::Approved),
                (TaskStatus::PendingApproval, TaskStatus::Approved),
                (TaskStatus::Sent, TaskStatus::Rejected),
                (TaskStatus::PendingApproval, TaskStatus::Rejected),
                (TaskStatus::Approved, TaskStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_actor_per_action() {
        assert_eq!(TaskAction::Send.actor(), Role::Child);
        assert_eq!(TaskAction::Approve.actor(), Role::Parent);
        assert_eq!(TaskAction::Reject.actor(), Role::Parent);
        assert!(TaskAction::for_target(TaskStatus::Pending).is_none());
    }

    #[test]
    fn test_completed_tasks_are_not_editable() {
        assert!(!TaskStatus::Completed.is_editable());
        assert!(TaskStatus::Approved.is_editable());
        assert!(TaskStatus::Pending.is_editable());
    }

    #[test]
    fn test_points_settle_once_reviewed() {
        assert!(TaskStatus::Approved.points_settled());
        assert!(TaskStatus::Rejected.points_settled());
        assert!(!TaskStatus::Sent.points_settled());
        assert!(!TaskStatus::PendingApproval.points_settled());
    }
}

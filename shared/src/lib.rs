//! Wire types shared between the Kiddo backend and its clients.
//!
//! Field names follow the JSON contract the web client already speaks:
//! camelCase keys and a Mongo-style `_id`. Status enums accept the legacy
//! hyphenated and mixed-case spellings on input and always serialize the
//! canonical snake_case form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of account a session or login belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

/// Status spellings seen from older clients (`pending-approval`,
/// `PENDING_APPROVAL`) reduced to the canonical snake_case form
fn normalize_status(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('-', "_")
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Profile of the authenticated account.
///
/// Child-only fields are absent for parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_points: Option<u32>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub age: u8,
    pub email: String,
    pub gender: Option<String>,
    pub interests: Vec<String>,
    pub total_points: u32,
    pub redeemed_points: u32,
    /// Derived: `total_points - redeemed_points`
    pub available_points: u32,
    /// Id of the owning parent
    pub parent: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: String,
    pub age: u8,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskStatus {
    Pending,
    Sent,
    PendingApproval,
    Approved,
    Rejected,
    Completed,
}

impl TryFrom<String> for TaskStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match normalize_status(&raw).as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "sent" => Ok(TaskStatus::Sent),
            "pending_approval" => Ok(TaskStatus::PendingApproval),
            "approved" => Ok(TaskStatus::Approved),
            "rejected" => Ok(TaskStatus::Rejected),
            "completed" | "complete" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status '{}'", raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_awarded: u32,
    pub due_date: Option<String>,
    /// Estimated effort in minutes
    pub estimated_duration: Option<u32>,
    pub status: TaskStatus,
    pub child_id: String,
    pub parent_id: String,
    pub wish_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sent_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub points_awarded: u32,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    pub child_id: String,
}

/// Body of `PUT /tasks/:id`.
///
/// Field edits and a status change may arrive together; a status equal to
/// the current one is treated as "no transition".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_awarded: Option<u32>,
    pub due_date: Option<String>,
    pub estimated_duration: Option<u32>,
    pub status: Option<TaskStatus>,
    pub rejection_reason: Option<String>,
}

/// Body of `PUT /tasks/status/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskFromWishRequest {
    pub points_awarded: u32,
    #[serde(default)]
    pub due_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Wishes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum WishStatus {
    Available,
    PendingApproval,
    Approved,
    Redeemed,
    Rejected,
}

impl TryFrom<String> for WishStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match normalize_status(&raw).as_str() {
            "available" => Ok(WishStatus::Available),
            "pending_approval" => Ok(WishStatus::PendingApproval),
            "approved" => Ok(WishStatus::Approved),
            "redeemed" => Ok(WishStatus::Redeemed),
            "rejected" => Ok(WishStatus::Rejected),
            _ => Err(format!("unknown wish status '{}'", raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_required: u32,
    pub child_id: String,
    pub parent_id: String,
    pub status: WishStatus,
    pub created_at: String,
    pub updated_at: String,
    pub requested_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub redeemed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWishRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub points_required: u32,
    /// Required when a parent creates the wish; a child always creates for itself
    #[serde(default)]
    pub child_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWishRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_required: Option<u32>,
    pub status: Option<WishStatus>,
    #[serde(alias = "rejectionReason")]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RewardStatus {
    Available,
    Redeemed,
}

impl TryFrom<String> for RewardStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match normalize_status(&raw).as_str() {
            "available" => Ok(RewardStatus::Available),
            "redeemed" => Ok(RewardStatus::Redeemed),
            _ => Err(format!("unknown reward status '{}'", raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    #[serde(rename = "_id")]
    pub id: String,
    pub reward_name: String,
    pub points: u32,
    pub parent_id: String,
    pub status: RewardStatus,
    pub redeemed_by: Option<String>,
    pub redeemed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardRequest {
    pub reward_name: String,
    pub points: u32,
}

/// Body of `PATCH /rewards/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRewardRequest {
    pub status: RewardStatus,
    #[serde(default)]
    pub child_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRewardResponse {
    pub reward: Reward,
    pub remaining_points: u32,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Sync signal
// ---------------------------------------------------------------------------

/// Resource category named by a sync signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTopic {
    Children,
    Tasks,
    Wishes,
    Rewards,
    All,
}

/// Payload of an SSE `sync` event. Advisory: clients re-fetch the topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub topic: SyncTopic,
}

// ---------------------------------------------------------------------------
// Generic responses
// ---------------------------------------------------------------------------

/// Error body returned for every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_accepts_legacy_spellings() {
        let hyphen: TaskStatus = serde_json::from_str("\"pending-approval\"").unwrap();
        assert_eq!(hyphen, TaskStatus::PendingApproval);

        let complete: TaskStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(complete, TaskStatus::Completed);

        // Output is always canonical
        assert_eq!(
            serde_json::to_string(&TaskStatus::PendingApproval).unwrap(),
            "\"pending_approval\""
        );
    }

    #[test]
    fn test_status_input_ignores_case() {
        let task: TaskStatus = serde_json::from_str("\"PENDING_APPROVAL\"").unwrap();
        assert_eq!(task, TaskStatus::PendingApproval);

        let wish: WishStatus = serde_json::from_str("\"Pending-Approval\"").unwrap();
        assert_eq!(wish, WishStatus::PendingApproval);

        let reward: RewardStatus = serde_json::from_str("\" Redeemed \"").unwrap();
        assert_eq!(reward, RewardStatus::Redeemed);

        assert!(serde_json::from_str::<TaskStatus>("\"finished\"").is_err());
    }

    #[test]
    fn test_wish_status_accepts_hyphenated_pending_approval() {
        let status: WishStatus = serde_json::from_str("\"pending-approval\"").unwrap();
        assert_eq!(status, WishStatus::PendingApproval);
    }

    #[test]
    fn test_task_uses_mongo_style_id_and_camel_case() {
        let task = Task {
            id: "t1".to_string(),
            title: "Dishes".to_string(),
            description: None,
            category: Some("Chores".to_string()),
            points_awarded: 10,
            due_date: None,
            estimated_duration: None,
            status: TaskStatus::Pending,
            child_id: "c1".to_string(),
            parent_id: "p1".to_string(),
            wish_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
            sent_at: None,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            completed_at: None,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["_id"], "t1");
        assert_eq!(json["pointsAwarded"], 10);
        assert_eq!(json["childId"], "c1");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_update_wish_request_accepts_rejection_reason_alias() {
        let request: UpdateWishRequest =
            serde_json::from_str(r#"{"status":"rejected","rejectionReason":"too pricey"}"#).unwrap();
        assert_eq!(request.status, Some(WishStatus::Rejected));
        assert_eq!(request.reason.as_deref(), Some("too pricey"));
    }

    #[test]
    fn test_parent_profile_omits_child_fields() {
        let profile = UserProfile {
            id: "p1".to_string(),
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            role: Role::Parent,
            parent: None,
            age: None,
            total_points: None,
            redeemed_points: None,
            available_points: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("totalPoints").is_none());
        assert_eq!(json["role"], "parent");
    }
}

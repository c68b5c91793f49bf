//! Row builders shared by repository and service tests.

use crate::backend::domain::models::{
    child::Child,
    parent::Parent,
    reward::{Reward, RewardStatus},
    task::{Task, TaskStatus},
    wish::{Wish, WishStatus},
};

pub(crate) const CREATED_AT: &str = "2025-01-01T00:00:00+00:00";

pub(crate) fn parent(id: &str) -> Parent {
    Parent {
        id: id.to_string(),
        name: format!("Parent {}", id),
        email: format!("{}@example.com", id),
        password_hash: "hash".to_string(),
        created_at: CREATED_AT.to_string(),
    }
}

pub(crate) fn child(id: &str, parent_id: &str, total_points: u32, redeemed_points: u32) -> Child {
    Child {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        name: format!("Child {}", id),
        age: 9,
        email: format!("{}@example.com", id),
        gender: None,
        interests: vec!["lego".to_string()],
        password_hash: "hash".to_string(),
        total_points,
        redeemed_points,
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
    }
}

pub(crate) fn task(id: &str, parent_id: &str, child_id: &str, points: u32, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        child_id: child_id.to_string(),
        wish_id: None,
        title: format!("Task {}", id),
        description: None,
        category: None,
        points_awarded: points,
        due_date: None,
        estimated_duration: None,
        status,
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        sent_at: None,
        approved_at: None,
        rejected_at: None,
        rejection_reason: None,
        completed_at: None,
    }
}

pub(crate) fn wish(id: &str, parent_id: &str, child_id: &str, points: u32, status: WishStatus) -> Wish {
    Wish {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        child_id: child_id.to_string(),
        title: format!("Wish {}", id),
        description: None,
        category: None,
        points_required: points,
        status,
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        requested_at: None,
        approved_at: None,
        rejected_at: None,
        rejection_reason: None,
        redeemed_at: None,
    }
}

pub(crate) fn reward(id: &str, parent_id: &str, points: u32) -> Reward {
    Reward {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        reward_name: format!("Reward {}", id),
        points,
        status: RewardStatus::Available,
        redeemed_by: None,
        redeemed_at: None,
        created_at: CREATED_AT.to_string(),
    }
}

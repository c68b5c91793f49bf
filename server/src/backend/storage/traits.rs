//! # Storage Traits
//!
//! Storage abstractions the domain services depend on. Ledger-affecting
//! operations (task approval, wish approval, reward redemption) are single
//! trait methods so that an implementation can run the status change and
//! the balance change in one atomic unit.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::backend::domain::models::{
    child::Child,
    parent::Parent,
    reward::Reward,
    task::{Task, TaskStatus},
    wish::{Wish, WishStatus},
};

/// Result of a guarded ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// Status and balance were both updated
    Applied,
    /// The entity was no longer in the expected status; nothing changed
    StatusConflict,
    /// The child's balance could not cover the spend; nothing changed
    InsufficientPoints,
}

/// An insert or update lost the race for an email address another account holds
#[derive(Debug, Error)]
#[error("An account with this email already exists")]
pub struct DuplicateEmail;

/// A guarded task status change
#[derive(Debug, Clone)]
pub struct TaskTransition<'a> {
    pub task_id: &'a str,
    /// The update only applies while the task is in one of these states
    pub from: &'a [TaskStatus],
    pub to: TaskStatus,
    /// RFC 3339 timestamp recorded for the target state
    pub at: &'a str,
    pub rejection_reason: Option<&'a str>,
    /// Points credited to the task's child when the transition applies
    pub award: Option<u32>,
}

/// A guarded wish status change
#[derive(Debug, Clone)]
pub struct WishTransition<'a> {
    pub wish_id: &'a str,
    pub from: WishStatus,
    pub to: WishStatus,
    pub at: &'a str,
    pub rejection_reason: Option<&'a str>,
    /// Points debited from the wish's child when the transition applies
    pub spend: Option<u32>,
}

#[async_trait]
pub trait ParentStorage: Send + Sync {
    async fn store_parent(&self, parent: &Parent) -> Result<()>;

    async fn get_parent(&self, parent_id: &str) -> Result<Option<Parent>>;

    /// Lookup by (lowercased) email
    async fn find_parent_by_email(&self, email: &str) -> Result<Option<Parent>>;
}

#[async_trait]
pub trait ChildStorage: Send + Sync {
    async fn store_child(&self, child: &Child) -> Result<()>;

    async fn get_child(&self, child_id: &str) -> Result<Option<Child>>;

    /// Lookup by (lowercased) email
    async fn find_child_by_email(&self, email: &str) -> Result<Option<Child>>;

    /// Children of one parent ordered by name
    async fn list_children_for_parent(&self, parent_id: &str) -> Result<Vec<Child>>;

    /// Update profile fields and password hash. Point counters are never
    /// written through this method.
    async fn update_child_profile(&self, child: &Child) -> Result<()>;

    /// Delete a child together with its tasks and wishes.
    /// Returns false if no such child existed.
    async fn delete_child(&self, child_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait TaskStorage: Send + Sync {
    async fn store_task(&self, task: &Task) -> Result<()>;

    async fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    /// Newest first
    async fn list_tasks_for_child(&self, child_id: &str) -> Result<Vec<Task>>;

    /// Newest first
    async fn list_tasks_for_parent(&self, parent_id: &str) -> Result<Vec<Task>>;

    /// Write editable fields. Returns false when the task is missing, has
    /// become `completed`, or would change points that are already settled
    /// (`approved`/`rejected`).
    async fn update_task_details(&self, task: &Task) -> Result<bool>;

    async fn delete_task(&self, task_id: &str) -> Result<bool>;

    /// Apply a guarded status change (and optional award) atomically.
    /// Returns false if the task was not in any `from` state.
    async fn transition_task(&self, transition: &TaskTransition<'_>) -> Result<bool>;
}

#[async_trait]
pub trait WishStorage: Send + Sync {
    async fn store_wish(&self, wish: &Wish) -> Result<()>;

    async fn get_wish(&self, wish_id: &str) -> Result<Option<Wish>>;

    /// Newest first
    async fn list_wishes_for_child(&self, child_id: &str) -> Result<Vec<Wish>>;

    /// Newest first
    async fn list_wishes_for_parent(&self, parent_id: &str) -> Result<Vec<Wish>>;

    /// Write editable fields. Returns false unless the wish is still `available`.
    async fn update_wish_details(&self, wish: &Wish) -> Result<bool>;

    async fn delete_wish(&self, wish_id: &str) -> Result<bool>;

    /// Apply a guarded status change (and optional spend) atomically
    async fn transition_wish(&self, transition: &WishTransition<'_>) -> Result<LedgerOutcome>;
}

#[async_trait]
pub trait RewardStorage: Send + Sync {
    async fn store_reward(&self, reward: &Reward) -> Result<()>;

    async fn get_reward(&self, reward_id: &str) -> Result<Option<Reward>>;

    /// Newest first
    async fn list_rewards_for_parent(&self, parent_id: &str) -> Result<Vec<Reward>>;

    async fn delete_reward(&self, reward_id: &str) -> Result<bool>;

    /// Mark the reward redeemed by `child_id` and debit `points` from the
    /// child, all or nothing.
    async fn redeem_reward(
        &self,
        reward_id: &str,
        child_id: &str,
        points: u32,
        at: &str,
    ) -> Result<LedgerOutcome>;
}

//! Parent-defined reward catalog and point redemption.

use chrono::Utc;
use shared::SyncTopic;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::backend::domain::child_service::ChildService;
use crate::backend::domain::commands::rewards::{
    CreateRewardCommand, RedeemRewardCommand, RedeemRewardResult,
};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::ledger;
use crate::backend::domain::models::{
    reward::{Reward, RewardStatus},
    session::Session,
};
use crate::backend::domain::sync::SyncHub;
use crate::backend::domain::validation;
use crate::backend::storage::{LedgerOutcome, ParentStorage, RewardStorage};

const MAX_REWARD_POINTS: u32 = 10_000;

#[derive(Clone)]
pub struct RewardService {
    rewards: Arc<dyn RewardStorage>,
    parents: Arc<dyn ParentStorage>,
    child_service: ChildService,
    sync: SyncHub,
}

impl RewardService {
    pub fn new(
        rewards: Arc<dyn RewardStorage>,
        parents: Arc<dyn ParentStorage>,
        child_service: ChildService,
        sync: SyncHub,
    ) -> Self {
        Self {
            rewards,
            parents,
            child_service,
            sync,
        }
    }

    async fn load(&self, reward_id: &str) -> DomainResult<Reward> {
        self.rewards
            .get_reward(reward_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reward"))
    }

    pub async fn create(&self, session: &Session, command: CreateRewardCommand) -> DomainResult<Reward> {
        let parent_id = session.require_parent()?;
        info!("Creating reward for parent {}", parent_id);

        let reward = Reward {
            id: Uuid::new_v4().to_string(),
            parent_id: parent_id.to_string(),
            reward_name: validation::required_text(&command.reward_name, "Reward name", Reward::MAX_NAME_LEN)?,
            points: validation::points_in_range(command.points, "Points", 1, MAX_REWARD_POINTS)?,
            status: RewardStatus::Available,
            redeemed_by: None,
            redeemed_at: None,
            created_at: Utc::now().to_rfc3339(),
        };

        self.rewards.store_reward(&reward).await?;
        self.sync.publish(parent_id, SyncTopic::Rewards);
        Ok(reward)
    }

    /// The catalog of the family `parent_or_child_id` belongs to
    pub async fn list(&self, session: &Session, parent_or_child_id: &str) -> DomainResult<Vec<Reward>> {
        let parent_id = match self.parents.get_parent(parent_or_child_id).await? {
            Some(parent) => parent.id,
            None => self.child_service.load(parent_or_child_id).await?.parent_id,
        };

        if self.child_service.family_of(session).await? != parent_id {
            return Err(DomainError::forbidden("You do not have access to these rewards"));
        }
        Ok(self.rewards.list_rewards_for_parent(&parent_id).await?)
    }

    pub async fn delete(&self, session: &Session, reward_id: &str) -> DomainResult<()> {
        let parent_id = session.require_parent()?;
        let reward = self.load(reward_id).await?;
        if reward.parent_id != parent_id {
            return Err(DomainError::forbidden("You do not have access to this reward"));
        }
        info!("Deleting reward {}", reward_id);

        if !self.rewards.delete_reward(reward_id).await? {
            return Err(DomainError::not_found("Reward"));
        }
        self.sync.publish(parent_id, SyncTopic::Rewards);
        Ok(())
    }

    /// Spend a child's points on a reward. A child redeems for itself, a
    /// parent on behalf of one of its children.
    pub async fn redeem(&self, session: &Session, command: RedeemRewardCommand) -> DomainResult<RedeemRewardResult> {
        let reward = self.load(&command.reward_id).await?;

        let child_id = if session.is_child() {
            if command.child_id.as_deref().is_some_and(|id| id != session.user_id) {
                return Err(DomainError::forbidden("Children can only redeem for themselves"));
            }
            session.user_id.clone()
        } else {
            command
                .child_id
                .clone()
                .ok_or_else(|| DomainError::validation("childId is required"))?
        };
        let child = self.child_service.authorize_access(session, &child_id).await?;

        if child.parent_id != reward.parent_id {
            return Err(DomainError::forbidden("This reward belongs to another family"));
        }
        if !reward.is_redeemable() {
            return Err(DomainError::invalid_transition(reward.status, RewardStatus::Redeemed));
        }
        ledger::ensure_affordable(&child, reward.points)?;

        let at = Utc::now().to_rfc3339();
        match self
            .rewards
            .redeem_reward(&reward.id, &child.id, reward.points, &at)
            .await?
        {
            LedgerOutcome::Applied => {}
            LedgerOutcome::StatusConflict => {
                return Err(DomainError::invalid_transition(RewardStatus::Redeemed, RewardStatus::Redeemed));
            }
            LedgerOutcome::InsufficientPoints => {
                let current = self.child_service.load(&child.id).await?;
                return Err(DomainError::InsufficientPoints {
                    available: ledger::available_points(&current),
                    required: reward.points,
                });
            }
        }

        let child = self.child_service.load(&child.id).await?;
        let remaining_points = ledger::available_points(&child);
        info!(
            "Child {} redeemed reward {} for {} points, {} left",
            child.id, reward.id, reward.points, remaining_points
        );
        self.sync.publish(&reward.parent_id, SyncTopic::Rewards);
        self.sync.publish(&reward.parent_id, SyncTopic::Children);

        Ok(RedeemRewardResult {
            reward: self.load(&reward.id).await?,
            remaining_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::Harness;

    fn new_reward(points: u32) -> CreateRewardCommand {
        CreateRewardCommand {
            reward_name: "Movie night".to_string(),
            points,
        }
    }

    fn redeem(reward_id: &str, child_id: Option<&str>) -> RedeemRewardCommand {
        RedeemRewardCommand {
            reward_id: reward_id.to_string(),
            child_id: child_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_parent_or_child_id() {
        let h = Harness::new().await;
        let reward = h.rewards.create(&h.parent, new_reward(30)).await.unwrap();
        assert_eq!(reward.status, RewardStatus::Available);

        assert_eq!(h.rewards.list(&h.parent, "p1").await.unwrap().len(), 1);
        assert_eq!(h.rewards.list(&h.child, "c1").await.unwrap().len(), 1);
        assert_eq!(h.rewards.list(&h.child, "p1").await.unwrap().len(), 1);

        assert!(matches!(h.rewards.list(&h.other_parent, "c1").await, Err(DomainError::Forbidden(_))));
        assert!(matches!(h.rewards.list(&h.parent, "ghost").await, Err(DomainError::NotFound(_))));

        assert!(matches!(h.rewards.create(&h.child, new_reward(30)).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(h.rewards.create(&h.parent, new_reward(0)).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_child_redeems_and_gets_remaining_points() {
        let h = Harness::new().await;
        h.set_points("c1", 100, 20).await;
        let reward = h.rewards.create(&h.parent, new_reward(30)).await.unwrap();

        let result = h.rewards.redeem(&h.child, redeem(&reward.id, None)).await.unwrap();
        assert_eq!(result.remaining_points, 50);
        assert_eq!(result.reward.status, RewardStatus::Redeemed);
        assert_eq!(result.reward.redeemed_by.as_deref(), Some("c1"));
        assert!(result.reward.redeemed_at.is_some());

        assert!(matches!(
            h.rewards.redeem(&h.child, redeem(&reward.id, None)).await,
            Err(DomainError::InvalidTransition { .. })
        ));
        assert_eq!(h.child_record("c1").await.redeemed_points, 50);
    }

    #[tokio::test]
    async fn test_redeem_never_overdraws() {
        let h = Harness::new().await;
        h.set_points("c1", 20, 0).await;
        let reward = h.rewards.create(&h.parent, new_reward(30)).await.unwrap();

        assert!(matches!(
            h.rewards.redeem(&h.child, redeem(&reward.id, None)).await,
            Err(DomainError::InsufficientPoints { available: 20, required: 30 })
        ));

        let child = h.child_record("c1").await;
        assert_eq!(child.redeemed_points, 0);
        assert!(child.redeemed_points <= child.total_points);
    }

    #[tokio::test]
    async fn test_parent_redeems_on_behalf_of_own_child_only() {
        let h = Harness::new().await;
        h.set_points("c1", 50, 0).await;
        h.set_points("c2", 50, 0).await;
        let reward = h.rewards.create(&h.parent, new_reward(30)).await.unwrap();

        assert!(matches!(
            h.rewards.redeem(&h.parent, redeem(&reward.id, None)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            h.rewards.redeem(&h.other_child, redeem(&reward.id, None)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            h.rewards.redeem(&h.child, redeem(&reward.id, Some("c2"))).await,
            Err(DomainError::Forbidden(_))
        ));

        let result = h.rewards.redeem(&h.parent, redeem(&reward.id, Some("c1"))).await.unwrap();
        assert_eq!(result.remaining_points, 20);
    }

    #[tokio::test]
    async fn test_delete_is_owner_only() {
        let h = Harness::new().await;
        let reward = h.rewards.create(&h.parent, new_reward(30)).await.unwrap();

        assert!(matches!(h.rewards.delete(&h.other_parent, &reward.id).await, Err(DomainError::Forbidden(_))));
        h.rewards.delete(&h.parent, &reward.id).await.unwrap();
        assert!(matches!(h.rewards.delete(&h.parent, &reward.id).await, Err(DomainError::NotFound(_))));
    }
}

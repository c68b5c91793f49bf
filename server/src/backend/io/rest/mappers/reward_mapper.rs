use shared::{RedeemRewardResponse, Reward as SharedReward, RewardStatus as SharedRewardStatus};

use crate::backend::domain::commands::rewards::RedeemRewardResult;
use crate::backend::domain::models::reward::{Reward as DomainReward, RewardStatus};

/// Mapper between reward DTOs and domain rewards
pub struct RewardMapper;

impl RewardMapper {
    pub fn to_dto(domain: DomainReward) -> SharedReward {
        SharedReward {
            id: domain.id,
            reward_name: domain.reward_name,
            points: domain.points,
            parent_id: domain.parent_id,
            status: match domain.status {
                RewardStatus::Available => SharedRewardStatus::Available,
                RewardStatus::Redeemed => SharedRewardStatus::Redeemed,
            },
            redeemed_by: domain.redeemed_by,
            redeemed_at: domain.redeemed_at,
            created_at: domain.created_at,
        }
    }

    pub fn to_redeem_response(result: RedeemRewardResult) -> RedeemRewardResponse {
        let message = format!(
            "Redeemed '{}' for {} points",
            result.reward.reward_name, result.reward.points
        );
        RedeemRewardResponse {
            reward: Self::to_dto(result.reward),
            remaining_points: result.remaining_points,
            message,
        }
    }
}

use shared::{CreateWishRequest, UpdateWishRequest, Wish as SharedWish, WishStatus as SharedWishStatus};

use crate::backend::domain::commands::wishes::{
    CreateWishCommand, EditWishCommand, UpdateWishCommand, WishStatusCommand,
};
use crate::backend::domain::models::wish::{Wish as DomainWish, WishStatus};

/// Mapper between wish DTOs and domain wishes
pub struct WishMapper;

impl WishMapper {
    pub fn status_to_domain(status: SharedWishStatus) -> WishStatus {
        match status {
            SharedWishStatus::Available => WishStatus::Available,
            SharedWishStatus::PendingApproval => WishStatus::PendingApproval,
            SharedWishStatus::Approved => WishStatus::Approved,
            SharedWishStatus::Redeemed => WishStatus::Redeemed,
            SharedWishStatus::Rejected => WishStatus::Rejected,
        }
    }

    pub fn status_to_dto(status: WishStatus) -> SharedWishStatus {
        match status {
            WishStatus::Available => SharedWishStatus::Available,
            WishStatus::PendingApproval => SharedWishStatus::PendingApproval,
            WishStatus::Approved => SharedWishStatus::Approved,
            WishStatus::Redeemed => SharedWishStatus::Redeemed,
            WishStatus::Rejected => SharedWishStatus::Rejected,
        }
    }

    pub fn to_dto(domain: DomainWish) -> SharedWish {
        SharedWish {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            category: domain.category,
            points_required: domain.points_required,
            child_id: domain.child_id,
            parent_id: domain.parent_id,
            status: Self::status_to_dto(domain.status),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            requested_at: domain.requested_at,
            approved_at: domain.approved_at,
            rejected_at: domain.rejected_at,
            rejection_reason: domain.rejection_reason,
            redeemed_at: domain.redeemed_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainWish>) -> Vec<SharedWish> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreateWishRequest) -> CreateWishCommand {
        CreateWishCommand {
            child_id: request.child_id,
            title: request.title,
            description: request.description,
            category: request.category,
            points_required: request.points_required,
        }
    }

    pub fn to_update_command(request: UpdateWishRequest) -> UpdateWishCommand {
        UpdateWishCommand {
            edit: EditWishCommand {
                title: request.title,
                description: request.description,
                category: request.category,
                points_required: request.points_required,
            },
            status: request.status.map(|status| WishStatusCommand {
                status: Self::status_to_domain(status),
                reason: request.reason,
            }),
        }
    }
}

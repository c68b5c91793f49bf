//! Domain model for a wish: a child-authored reward request tied to a
//! point threshold.

use shared::Role;
use std::fmt;
use std::str::FromStr;

use super::{normalize_status, UnknownStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WishStatus {
    Available,
    PendingApproval,
    Approved,
    Redeemed,
    Rejected,
}

impl WishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishStatus::Available => "available",
            WishStatus::PendingApproval => "pending_approval",
            WishStatus::Approved => "approved",
            WishStatus::Redeemed => "redeemed",
            WishStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "available" => Ok(WishStatus::Available),
            "pending_approval" => Ok(WishStatus::PendingApproval),
            "approved" => Ok(WishStatus::Approved),
            "redeemed" => Ok(WishStatus::Redeemed),
            "rejected" => Ok(WishStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishAction {
    RequestRedemption,
    Approve,
    Reject,
    Fulfill,
}

impl WishAction {
    pub fn target(&self) -> WishStatus {
        match self {
            WishAction::RequestRedemption => WishStatus::PendingApproval,
            WishAction::Approve => WishStatus::Approved,
            WishAction::Reject => WishStatus::Rejected,
            WishAction::Fulfill => WishStatus::Redeemed,
        }
    }

    pub fn source(&self) -> WishStatus {
        match self {
            WishAction::RequestRedemption => WishStatus::Available,
            WishAction::Approve | WishAction::Reject => WishStatus::PendingApproval,
            WishAction::Fulfill => WishStatus::Approved,
        }
    }

    pub fn actor(&self) -> Role {
        match self {
            WishAction::RequestRedemption => Role::Child,
            _ => Role::Parent,
        }
    }

    pub fn for_target(status: WishStatus) -> Option<WishAction> {
        match status {
            WishStatus::Available => None,
            WishStatus::PendingApproval => Some(WishAction::RequestRedemption),
            WishStatus::Approved => Some(WishAction::Approve),
            WishStatus::Rejected => Some(WishAction::Reject),
            WishStatus::Redeemed => Some(WishAction::Fulfill),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wish {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points_required: u32,
    pub status: WishStatus,
    pub created_at: String,
    pub updated_at: String,
    pub requested_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub redeemed_at: Option<String>,
}

impl Wish {
    pub const MIN_POINTS: u32 = 1;
    pub const MAX_POINTS: u32 = 500;
    pub const MAX_TITLE_LEN: usize = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_agree() {
        for status in [
            WishStatus::Available,
            WishStatus::PendingApproval,
            WishStatus::Approved,
            WishStatus::Redeemed,
            WishStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<WishStatus>().unwrap(), status);
        }
        assert_eq!("pending-approval".parse::<WishStatus>().unwrap(), WishStatus::PendingApproval);
    }

    #[test]
    fn test_actions_chain_through_the_lifecycle() {
        assert_eq!(WishAction::RequestRedemption.source(), WishStatus::Available);
        assert_eq!(WishAction::Approve.source(), WishAction::RequestRedemption.target());
        assert_eq!(WishAction::Fulfill.source(), WishAction::Approve.target());
        assert_eq!(WishAction::RequestRedemption.actor(), Role::Child);
        assert_eq!(WishAction::Reject.actor(), Role::Parent);
    }
}

//! Domain model for a parent-defined reward catalog entry.

use std::fmt;
use std::str::FromStr;

use super::{normalize_status, UnknownStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardStatus {
    Available,
    Redeemed,
}

impl RewardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardStatus::Available => "available",
            RewardStatus::Redeemed => "redeemed",
        }
    }
}

impl fmt::Display for RewardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "available" => Ok(RewardStatus::Available),
            "redeemed" => Ok(RewardStatus::Redeemed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub id: String,
    pub parent_id: String,
    pub reward_name: String,
    pub points: u32,
    pub status: RewardStatus,
    pub redeemed_by: Option<String>,
    pub redeemed_at: Option<String>,
    pub created_at: String,
}

impl Reward {
    pub const MAX_NAME_LEN: usize = 100;

    pub fn is_redeemable(&self) -> bool {
        self.status != RewardStatus::Redeemed
    }
}

//! Domain model for a child account.

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub age: u8,
    /// Stored lowercased
    pub email: String,
    pub gender: Option<String>,
    pub interests: Vec<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Points earned through approved tasks
    pub total_points: u32,
    /// Points spent on rewards and approved wishes
    pub redeemed_points: u32,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

impl Child {
    pub const MIN_AGE: u8 = 1;
    pub const MAX_AGE: u8 = 18;

    pub fn is_valid_age(age: u8) -> bool {
        (Self::MIN_AGE..=Self::MAX_AGE).contains(&age)
    }
}

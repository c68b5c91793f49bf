//! Domain model for a parent account.

#[derive(Debug, Clone, PartialEq)]
pub struct Parent {
    pub id: String,
    pub name: String,
    /// Stored lowercased
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: String, // RFC 3339 timestamp
}

use shared::{AuthResponse, Role, UserProfile};

use crate::backend::domain::commands::auth::{Account, AuthResult};
use crate::backend::domain::ledger::available_points;

/// Mapper from authenticated accounts to the profile DTO
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(account: Account) -> UserProfile {
        match account {
            Account::Parent(parent) => UserProfile {
                id: parent.id,
                name: parent.name,
                email: parent.email,
                role: Role::Parent,
                parent: None,
                age: None,
                total_points: None,
                redeemed_points: None,
                available_points: None,
                created_at: parent.created_at,
            },
            Account::Child(child) => UserProfile {
                available_points: Some(available_points(&child)),
                id: child.id,
                name: child.name,
                email: child.email,
                role: Role::Child,
                parent: Some(child.parent_id),
                age: Some(child.age),
                total_points: Some(child.total_points),
                redeemed_points: Some(child.redeemed_points),
                created_at: child.created_at,
            },
        }
    }

    pub fn to_auth_response(result: AuthResult) -> AuthResponse {
        AuthResponse {
            user: Self::to_dto(result.account),
            token: result.token,
        }
    }
}

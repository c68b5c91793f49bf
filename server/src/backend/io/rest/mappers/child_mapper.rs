use shared::{Child as SharedChild, CreateChildRequest, UpdateChildRequest};

use crate::backend::domain::commands::children::{CreateChildCommand, UpdateChildCommand};
use crate::backend::domain::ledger::available_points;
use crate::backend::domain::models::child::Child as DomainChild;

/// Mapper between child DTOs and domain children
pub struct ChildMapper;

impl ChildMapper {
    /// Converts a domain child to its DTO. The password hash never leaves
    /// the domain.
    pub fn to_dto(domain: DomainChild) -> SharedChild {
        SharedChild {
            available_points: available_points(&domain),
            id: domain.id,
            name: domain.name,
            age: domain.age,
            email: domain.email,
            gender: domain.gender,
            interests: domain.interests,
            total_points: domain.total_points,
            redeemed_points: domain.redeemed_points,
            parent: domain.parent_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_create_command(request: CreateChildRequest) -> CreateChildCommand {
        CreateChildCommand {
            name: request.name,
            age: request.age,
            email: request.email,
            password: request.password,
            gender: request.gender,
            interests: request.interests,
        }
    }

    pub fn to_update_command(request: UpdateChildRequest) -> UpdateChildCommand {
        UpdateChildCommand {
            name: request.name,
            age: request.age,
            email: request.email,
            password: request.password,
            gender: request.gender,
            interests: request.interests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::sqlite::repositories::fixtures;

    #[test]
    fn test_to_dto_derives_available_points() {
        let dto = ChildMapper::to_dto(fixtures::child("c1", "p1", 90, 35));
        assert_eq!(dto.available_points, 55);
        assert_eq!(dto.parent, "p1");

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["_id"], "c1");
    }
}

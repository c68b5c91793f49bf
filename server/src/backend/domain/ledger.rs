//! Points ledger arithmetic.
//!
//! A child's balance is never stored: it is always `total_points -
//! redeemed_points`. Every consumer goes through [`available_points`] so the
//! derivation lives in exactly one place. Storage re-applies the same guard
//! inside its conditional updates.

use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::child::Child;

/// Points a child can still spend
pub fn available_points(child: &Child) -> u32 {
    child.total_points.saturating_sub(child.redeemed_points)
}

/// Whether `required` points can be spent right now
pub fn can_afford(child: &Child, required: u32) -> bool {
    available_points(child) >= required
}

/// Fail with `InsufficientPoints` unless the child can spend `required`
pub fn ensure_affordable(child: &Child, required: u32) -> DomainResult<()> {
    let available = available_points(child);
    if available >= required {
        Ok(())
    } else {
        Err(DomainError::InsufficientPoints { available, required })
    }
}

/// Balance left after spending `spent` points
pub fn remaining_after(child: &Child, spent: u32) -> u32 {
    available_points(child).saturating_sub(spent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_with(total: u32, redeemed: u32) -> Child {
        Child {
            id: "c1".to_string(),
            parent_id: "p1".to_string(),
            name: "Ada".to_string(),
            age: 9,
            email: "ada@example.com".to_string(),
            gender: None,
            interests: vec![],
            password_hash: String::new(),
            total_points: total,
            redeemed_points: redeemed,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_available_points() {
        assert_eq!(available_points(&child_with(120, 20)), 100);
        assert_eq!(available_points(&child_with(0, 0)), 0);
    }

    #[test]
    fn test_available_points_never_underflows() {
        // Corrupt rows must not panic the server
        assert_eq!(available_points(&child_with(10, 30)), 0);
    }

    #[test]
    fn test_ensure_affordable() {
        let child = child_with(30, 0);
        assert!(ensure_affordable(&child, 30).is_ok());

        match ensure_affordable(&child, 50) {
            Err(DomainError::InsufficientPoints { available, required }) => {
                assert_eq!(available, 30);
                assert_eq!(required, 50);
            }
            other => panic!("expected InsufficientPoints, got {:?}", other),
        }
        assert!(can_afford(&child, 0));
        assert_eq!(remaining_after(&child, 25), 5);
    }
}

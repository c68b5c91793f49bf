//! The authenticated actor of a request.

use shared::Role;

use crate::backend::domain::error::{DomainError, DomainResult};

/// Identity carried by a validated bearer token.
///
/// Built once per request by the REST layer and handed to every service
/// call; services never look at headers or tokens themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            token: token.into(),
        }
    }

    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }

    pub fn is_child(&self) -> bool {
        self.role == Role::Child
    }

    /// Fail with `Forbidden` unless the actor is a parent; returns the parent id
    pub fn require_parent(&self) -> DomainResult<&str> {
        if self.is_parent() {
            Ok(&self.user_id)
        } else {
            Err(DomainError::Forbidden("Only parents can perform this action".to_string()))
        }
    }

    /// Fail with `Forbidden` unless the actor is a child; returns the child id
    pub fn require_child(&self) -> DomainResult<&str> {
        if self.is_child() {
            Ok(&self.user_id)
        } else {
            Err(DomainError::Forbidden("Only children can perform this action".to_string()))
        }
    }
}

//! Children management and the ownership checks every other service leans on.
//!
//! A child belongs to exactly one parent. Parents see and manage their own
//! children; a child sees only itself.

use chrono::Utc;
use shared::SyncTopic;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::backend::domain::commands::children::{CreateChildCommand, UpdateChildCommand};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::{child::Child, session::Session};
use crate::backend::domain::password::hash_password;
use crate::backend::domain::sync::SyncHub;
use crate::backend::domain::validation;
use crate::backend::storage::ChildStorage;

#[derive(Clone)]
pub struct ChildService {
    children: Arc<dyn ChildStorage>,
    sync: SyncHub,
}

impl ChildService {
    pub fn new(children: Arc<dyn ChildStorage>, sync: SyncHub) -> Self {
        Self { children, sync }
    }

    /// Load a child or fail with `NotFound`
    pub async fn load(&self, child_id: &str) -> DomainResult<Child> {
        self.children
            .get_child(child_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Child"))
    }

    /// Load a child the session may read: the child itself or its parent
    pub async fn authorize_access(&self, session: &Session, child_id: &str) -> DomainResult<Child> {
        let child = self.load(child_id).await?;
        let allowed = if session.is_parent() {
            child.parent_id == session.user_id
        } else {
            child.id == session.user_id
        };

        if allowed {
            Ok(child)
        } else {
            Err(DomainError::forbidden("You do not have access to this child"))
        }
    }

    /// Load a child the session manages as its parent
    pub async fn authorize_parent(&self, session: &Session, child_id: &str) -> DomainResult<Child> {
        let parent_id = session.require_parent()?;
        let child = self.load(child_id).await?;
        if child.parent_id == parent_id {
            Ok(child)
        } else {
            Err(DomainError::forbidden("You do not have access to this child"))
        }
    }

    /// Id of the parent owning the session's data
    pub async fn family_of(&self, session: &Session) -> DomainResult<String> {
        if session.is_parent() {
            Ok(session.user_id.clone())
        } else {
            Ok(self.load(&session.user_id).await?.parent_id)
        }
    }

    pub async fn list(&self, session: &Session) -> DomainResult<Vec<Child>> {
        let parent_id = session.require_parent()?;
        Ok(self.children.list_children_for_parent(parent_id).await?)
    }

    pub async fn get(&self, session: &Session, child_id: &str) -> DomainResult<Child> {
        self.authorize_access(session, child_id).await
    }

    pub async fn create(&self, session: &Session, command: CreateChildCommand) -> DomainResult<Child> {
        let parent_id = session.require_parent()?;
        info!("Creating child for parent {}", parent_id);

        let name = validation::required_text(&command.name, "Name", validation::MAX_NAME_LEN)?;
        if !Child::is_valid_age(command.age) {
            return Err(DomainError::validation(format!(
                "Age must be between {} and {}",
                Child::MIN_AGE,
                Child::MAX_AGE
            )));
        }
        let email = validation::email(&command.email)?;
        validation::password(&command.password)?;

        if self.children.find_child_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("A child with this email already exists".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let child = Child {
            id: Uuid::new_v4().to_string(),
            parent_id: parent_id.to_string(),
            name,
            age: command.age,
            email,
            gender: validation::optional_text(command.gender.as_deref(), "Gender", 20)?,
            interests: clean_interests(command.interests),
            password_hash: hash_password(&command.password)?,
            total_points: 0,
            redeemed_points: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        self.children.store_child(&child).await?;
        info!("Created child {} ({})", child.id, child.name);
        self.sync.publish(parent_id, SyncTopic::Children);

        Ok(child)
    }

    pub async fn update(
        &self,
        session: &Session,
        child_id: &str,
        command: UpdateChildCommand,
    ) -> DomainResult<Child> {
        let mut child = self.authorize_parent(session, child_id).await?;
        info!("Updating child {}", child_id);

        if let Some(name) = command.name {
            child.name = validation::required_text(&name, "Name", validation::MAX_NAME_LEN)?;
        }
        if let Some(age) = command.age {
            if !Child::is_valid_age(age) {
                return Err(DomainError::validation(format!(
                    "Age must be between {} and {}",
                    Child::MIN_AGE,
                    Child::MAX_AGE
                )));
            }
            child.age = age;
        }
        if let Some(email) = command.email {
            let email = validation::email(&email)?;
            if email != child.email {
                if self.children.find_child_by_email(&email).await?.is_some() {
                    return Err(DomainError::Conflict("A child with this email already exists".to_string()));
                }
                child.email = email;
            }
        }
        if let Some(gender) = command.gender {
            child.gender = validation::optional_text(Some(&gender), "Gender", 20)?;
        }
        if let Some(interests) = command.interests {
            child.interests = clean_interests(interests);
        }
        if let Some(password) = command.password {
            validation::password(&password)?;
            child.password_hash = hash_password(&password)?;
        }

        child.updated_at = Utc::now().to_rfc3339();
        self.children.update_child_profile(&child).await?;
        self.sync.publish(&child.parent_id, SyncTopic::Children);

        // Re-read so the returned counters are current
        self.load(child_id).await
    }

    /// Delete a child with all of its tasks and wishes
    pub async fn delete(&self, session: &Session, child_id: &str) -> DomainResult<()> {
        let child = self.authorize_parent(session, child_id).await?;
        info!("Deleting child {}", child_id);

        if !self.children.delete_child(child_id).await? {
            return Err(DomainError::not_found("Child"));
        }
        self.sync.publish(&child.parent_id, SyncTopic::All);
        Ok(())
    }
}

fn clean_interests(interests: Vec<String>) -> Vec<String> {
    interests
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

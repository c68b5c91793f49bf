//! Wishes: child-authored reward requests tied to a point threshold.
//!
//! A child asks to redeem an `available` wish once it can afford it; the
//! parent approves (spending the points), rejects, and finally marks it
//! fulfilled. Spending re-checks the balance inside storage.

use chrono::Utc;
use shared::{Role, SyncTopic};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::domain::child_service::ChildService;
use crate::backend::domain::commands::wishes::{
    CreateWishCommand, EditWishCommand, UpdateWishCommand, WishStatusCommand,
};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::ledger;
use crate::backend::domain::models::{
    session::Session,
    wish::{Wish, WishAction, WishStatus},
};
use crate::backend::domain::sync::SyncHub;
use crate::backend::domain::validation;
use crate::backend::storage::{LedgerOutcome, WishStorage, WishTransition};

const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_CATEGORY_LEN: usize = 50;

#[derive(Clone)]
pub struct WishService {
    wishes: Arc<dyn WishStorage>,
    child_service: ChildService,
    sync: SyncHub,
}

impl WishService {
    pub fn new(wishes: Arc<dyn WishStorage>, child_service: ChildService, sync: SyncHub) -> Self {
        Self {
            wishes,
            child_service,
            sync,
        }
    }

    async fn load(&self, wish_id: &str) -> DomainResult<Wish> {
        self.wishes
            .get_wish(wish_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Wish"))
    }

    /// Load a wish the session may change: its parent or its child
    async fn load_for_member(&self, session: &Session, wish_id: &str) -> DomainResult<Wish> {
        let wish = self.load(wish_id).await?;
        let allowed = match session.role {
            Role::Parent => wish.parent_id == session.user_id,
            Role::Child => wish.child_id == session.user_id,
        };
        if allowed {
            Ok(wish)
        } else {
            Err(DomainError::forbidden("You do not have access to this wish"))
        }
    }

    fn validate_points(points: u32) -> DomainResult<u32> {
        validation::points_in_range(points, "Points required", Wish::MIN_POINTS, Wish::MAX_POINTS)
    }

    pub async fn create(&self, session: &Session, command: CreateWishCommand) -> DomainResult<Wish> {
        let child_id = match session.role {
            Role::Child => {
                if command.child_id.as_deref().is_some_and(|id| id != session.user_id) {
                    return Err(DomainError::forbidden("Children can only create their own wishes"));
                }
                session.user_id.clone()
            }
            Role::Parent => command
                .child_id
                .clone()
                .ok_or_else(|| DomainError::validation("childId is required"))?,
        };
        let child = self.child_service.authorize_access(session, &child_id).await?;
        info!("Creating wish for child {}", child.id);

        let title = validation::required_text(&command.title, "Title", Wish::MAX_TITLE_LEN)?;
        let points_required = Self::validate_points(command.points_required)?;

        let now = Utc::now().to_rfc3339();
        let wish = Wish {
            id: Uuid::new_v4().to_string(),
            parent_id: child.parent_id.clone(),
            child_id: child.id,
            title,
            description: validation::optional_text(
                command.description.as_deref(),
                "Description",
                MAX_DESCRIPTION_LEN,
            )?,
            category: validation::optional_text(command.category.as_deref(), "Category", MAX_CATEGORY_LEN)?,
            points_required,
            status: WishStatus::Available,
            created_at: now.clone(),
            updated_at: now,
            requested_at: None,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            redeemed_at: None,
        };

        self.wishes.store_wish(&wish).await?;
        info!("Created wish {} '{}'", wish.id, wish.title);
        self.sync.publish(&wish.parent_id, SyncTopic::Wishes);

        Ok(wish)
    }

    pub async fn list_for_child(&self, session: &Session, child_id: &str) -> DomainResult<Vec<Wish>> {
        self.child_service.authorize_access(session, child_id).await?;
        Ok(self.wishes.list_wishes_for_child(child_id).await?)
    }

    pub async fn list_for_parent(&self, session: &Session, parent_id: &str) -> DomainResult<Vec<Wish>> {
        if session.require_parent()? != parent_id {
            return Err(DomainError::forbidden("You can only list your own wishes"));
        }
        Ok(self.wishes.list_wishes_for_parent(parent_id).await?)
    }

    /// Edit fields of a wish that is still `available`
    pub async fn edit(&self, session: &Session, wish_id: &str, command: EditWishCommand) -> DomainResult<Wish> {
        let mut wish = self.load_for_member(session, wish_id).await?;
        info!("Editing wish {}", wish_id);

        if wish.status != WishStatus::Available {
            return Err(DomainError::Conflict("Only available wishes can be edited".to_string()));
        }

        if let Some(title) = command.title {
            wish.title = validation::required_text(&title, "Title", Wish::MAX_TITLE_LEN)?;
        }
        if let Some(description) = command.description {
            wish.description = validation::optional_text(Some(&description), "Description", MAX_DESCRIPTION_LEN)?;
        }
        if let Some(category) = command.category {
            wish.category = validation::optional_text(Some(&category), "Category", MAX_CATEGORY_LEN)?;
        }
        if let Some(points) = command.points_required {
            wish.points_required = Self::validate_points(points)?;
        }
        wish.updated_at = Utc::now().to_rfc3339();

        if !self.wishes.update_wish_details(&wish).await? {
            return Err(DomainError::Conflict("Only available wishes can be edited".to_string()));
        }
        self.sync.publish(&wish.parent_id, SyncTopic::Wishes);
        self.load(wish_id).await
    }

    pub async fn delete(&self, session: &Session, wish_id: &str) -> DomainResult<()> {
        let parent_id = session.require_parent()?;
        let wish = self.load(wish_id).await?;
        if wish.parent_id != parent_id {
            return Err(DomainError::forbidden("You do not have access to this wish"));
        }
        info!("Deleting wish {}", wish_id);

        if !self.wishes.delete_wish(wish_id).await? {
            return Err(DomainError::not_found("Wish"));
        }
        self.sync.publish(&wish.parent_id, SyncTopic::Wishes);
        Ok(())
    }

    /// Resolve and check a requested status change against `wish`: the
    /// edge, the actor, affordability and the reason. Writes nothing.
    async fn plan_transition(
        &self,
        session: &Session,
        wish: &Wish,
        command: &WishStatusCommand,
    ) -> DomainResult<(WishAction, Option<String>)> {
        let target = command.status;
        let action = WishAction::for_target(target)
            .ok_or_else(|| DomainError::invalid_transition(wish.status, target))?;

        let allowed = match action.actor() {
            Role::Child => session.require_child()? == wish.child_id,
            Role::Parent => session.require_parent()? == wish.parent_id,
        };
        if !allowed {
            return Err(DomainError::forbidden("You do not have access to this wish"));
        }

        if wish.status != action.source() {
            return Err(DomainError::invalid_transition(wish.status, target));
        }

        if action == WishAction::RequestRedemption {
            let child = self.child_service.load(&wish.child_id).await?;
            ledger::ensure_affordable(&child, wish.points_required)?;
        }

        let rejection_reason = match action {
            WishAction::Reject => validation::optional_text(
                command.reason.as_deref(),
                "Reason",
                validation::MAX_REASON_LEN,
            )?,
            _ => None,
        };
        Ok((action, rejection_reason))
    }

    /// Move a wish along one lifecycle edge
    pub async fn transition(
        &self,
        session: &Session,
        wish_id: &str,
        command: WishStatusCommand,
    ) -> DomainResult<Wish> {
        let wish = self.load(wish_id).await?;
        let target = command.status;
        let (action, rejection_reason) = self.plan_transition(session, &wish, &command).await?;
        let spend = match action {
            WishAction::Approve => Some(wish.points_required),
            _ => None,
        };

        let at = Utc::now().to_rfc3339();
        let outcome = self
            .wishes
            .transition_wish(&WishTransition {
                wish_id,
                from: action.source(),
                to: target,
                at: &at,
                rejection_reason: rejection_reason.as_deref(),
                spend,
            })
            .await?;

        match outcome {
            LedgerOutcome::Applied => {}
            LedgerOutcome::StatusConflict => {
                let current = self.load(wish_id).await?;
                warn!(
                    "Wish {} moved to {} before {} could apply",
                    wish_id, current.status, target
                );
                return Err(DomainError::invalid_transition(current.status, target));
            }
            LedgerOutcome::InsufficientPoints => {
                let child = self.child_service.load(&wish.child_id).await?;
                return Err(DomainError::InsufficientPoints {
                    available: ledger::available_points(&child),
                    required: wish.points_required,
                });
            }
        }

        info!("Wish {} {} -> {}", wish_id, wish.status, target);
        self.sync.publish(&wish.parent_id, SyncTopic::Wishes);
        if spend.is_some() {
            self.sync.publish(&wish.parent_id, SyncTopic::Children);
        }

        self.load(wish_id).await
    }

    /// Combined update: field edits first, then a status change if the
    /// requested status differs from the current one. An illegal status
    /// change is refused before any edit is written.
    pub async fn update(&self, session: &Session, wish_id: &str, command: UpdateWishCommand) -> DomainResult<Wish> {
        let current = self.load_for_member(session, wish_id).await?;
        let status = command.status.filter(|status| status.status != current.status);
        if let Some(status) = &status {
            // Affordability is judged against the edited threshold
            let mut preview = current.clone();
            if let Some(points) = command.edit.points_required {
                preview.points_required = Self::validate_points(points)?;
            }
            self.plan_transition(session, &preview, status).await?;
        }

        let mut wish = if command.edit.is_empty() {
            current
        } else {
            self.edit(session, wish_id, command.edit).await?
        };

        if let Some(status) = status {
            wish = self.transition(session, wish_id, status).await?;
        }
        Ok(wish)
    }
}

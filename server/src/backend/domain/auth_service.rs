//! Registration, login and session lookup.
//!
//! Only parents self-register; children get credentials from their parent
//! and log in with `role = child`. Tokens identify the actor and nothing
//! more.

use chrono::Utc;
use shared::Role;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::domain::commands::auth::{Account, AuthResult, LoginCommand, RegisterCommand};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::{parent::Parent, session::Session};
use crate::backend::domain::password::{hash_password, verify_password};
use crate::backend::domain::token_service::TokenService;
use crate::backend::domain::validation;
use crate::backend::storage::{ChildStorage, ParentStorage};

#[derive(Clone)]
pub struct AuthService {
    parents: Arc<dyn ParentStorage>,
    children: Arc<dyn ChildStorage>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(parents: Arc<dyn ParentStorage>, children: Arc<dyn ChildStorage>, tokens: TokenService) -> Self {
        Self {
            parents,
            children,
            tokens,
        }
    }

    pub async fn register(&self, command: RegisterCommand) -> DomainResult<AuthResult> {
        if command.role != Role::Parent {
            return Err(DomainError::forbidden(
                "Only parents can register; children are added by their parent",
            ));
        }

        let name = validation::required_text(&command.name, "Name", validation::MAX_NAME_LEN)?;
        let email = validation::email(&command.email)?;
        validation::password(&command.password)?;

        if self.parents.find_parent_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("An account with this email already exists".to_string()));
        }

        let parent = Parent {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: hash_password(&command.password)?,
            created_at: Utc::now().to_rfc3339(),
        };
        self.parents.store_parent(&parent).await?;
        info!("Registered parent {}", parent.id);

        let token = self.tokens.issue(&parent.id, Role::Parent, &parent.name)?;
        Ok(AuthResult {
            account: Account::Parent(parent),
            token,
        })
    }

    pub async fn login(&self, command: LoginCommand) -> DomainResult<AuthResult> {
        // Malformed emails can never match a stored account
        let email = validation::email(&command.email).map_err(|_| DomainError::InvalidCredentials)?;

        let (account, password_hash) = match command.role {
            Role::Parent => match self.parents.find_parent_by_email(&email).await? {
                Some(parent) => {
                    let hash = parent.password_hash.clone();
                    (Account::Parent(parent), hash)
                }
                None => return Err(self.reject_login(&email, command.role)),
            },
            Role::Child => match self.children.find_child_by_email(&email).await? {
                Some(child) => {
                    let hash = child.password_hash.clone();
                    (Account::Child(child), hash)
                }
                None => return Err(self.reject_login(&email, command.role)),
            },
        };

        if !verify_password(&command.password, &password_hash) {
            return Err(self.reject_login(&email, command.role));
        }

        let (id, name) = match &account {
            Account::Parent(parent) => (parent.id.as_str(), parent.name.as_str()),
            Account::Child(child) => (child.id.as_str(), child.name.as_str()),
        };
        let token = self.tokens.issue(id, command.role, name)?;
        info!("{} {} logged in", command.role, id);

        Ok(AuthResult { account, token })
    }

    fn reject_login(&self, email: &str, role: Role) -> DomainError {
        warn!("Failed {} login for {}", role, email);
        DomainError::InvalidCredentials
    }

    /// Validate a bearer token into a session
    pub fn authenticate(&self, token: &str) -> DomainResult<Session> {
        self.tokens.validate(token)
    }

    /// The account behind a session
    pub async fn me(&self, session: &Session) -> DomainResult<Account> {
        match session.role {
            Role::Parent => self
                .parents
                .get_parent(&session.user_id)
                .await?
                .map(Account::Parent)
                .ok_or(DomainError::InvalidToken),
            Role::Child => self
                .children
                .get_child(&session.user_id)
                .await?
                .map(Account::Child)
                .ok_or(DomainError::InvalidToken),
        }
    }

    /// Profile of a member of the caller's family: the parent or one of
    /// its children
    pub async fn profile(&self, session: &Session, user_id: &str) -> DomainResult<Account> {
        let family_id = match self.me(session).await? {
            Account::Parent(parent) => parent.id,
            Account::Child(child) => child.parent_id,
        };

        let account = match self.parents.get_parent(user_id).await? {
            Some(parent) => Account::Parent(parent),
            None => self
                .children
                .get_child(user_id)
                .await?
                .map(Account::Child)
                .ok_or_else(|| DomainError::not_found("User"))?,
        };

        let member_of = match &account {
            Account::Parent(parent) => &parent.id,
            Account::Child(child) => &child.parent_id,
        };
        if *member_of != family_id {
            return Err(DomainError::forbidden("You can only view your own family"));
        }
        Ok(account)
    }
}

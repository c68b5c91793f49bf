//! # Domain Module
//!
//! Business rules of the Kiddo tracker, independent of HTTP and SQL.
//!
//! - **models**: internal entities and their lifecycle enums
//! - **ledger**: the single derivation of a child's spendable balance
//! - **\*_service**: operations per area, each taking the caller's
//!   [`Session`](models::session::Session)
//! - **sync**: advisory change notifications
//!
//! Services validate input before touching storage and report failures as
//! [`DomainError`].

pub mod auth_service;
pub mod child_service;
pub mod commands;
pub mod error;
pub mod ledger;
pub mod models;
pub mod password;
pub mod reward_service;
pub mod sync;
pub mod task_service;
pub mod token_service;
pub mod validation;
pub mod wish_service;

pub use auth_service::AuthService;
pub use child_service::ChildService;
pub use error::{DomainError, DomainResult};
pub use reward_service::RewardService;
pub use sync::{SyncHub, SyncSignal};
pub use task_service::TaskService;
pub use token_service::TokenService;
pub use wish_service::WishService;

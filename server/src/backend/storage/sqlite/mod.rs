//! # SQLite Storage
//!
//! - **connection.rs** - pool setup and schema
//! - **repositories/** - one repository per table, each implementing its
//!   storage trait

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    ChildRepository, ParentRepository, RewardRepository, TaskRepository, WishRepository,
};

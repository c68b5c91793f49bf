//! # Storage Module
//!
//! Persistence for parents, children, tasks, wishes and rewards.
//!
//! Domain services only see the traits in [`traits`]; the SQLite
//! implementations live in [`sqlite`]. Operations that move points are
//! expressed as single guarded calls so the backend can apply the status
//! change and the balance change together or not at all.

pub mod sqlite;
pub mod traits;

pub use sqlite::{
    DbConnection, ParentRepository, ChildRepository, TaskRepository, WishRepository,
    RewardRepository,
};
pub use traits::{
    ChildStorage, DuplicateEmail, LedgerOutcome, ParentStorage, RewardStorage, TaskStorage, TaskTransition,
    WishStorage, WishTransition,
};

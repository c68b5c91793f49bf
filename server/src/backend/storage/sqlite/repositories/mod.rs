pub mod child_repository;
pub mod parent_repository;
pub mod reward_repository;
pub mod task_repository;
pub mod wish_repository;

pub use child_repository::ChildRepository;
pub use parent_repository::ParentRepository;
pub use reward_repository::RewardRepository;
pub use task_repository::TaskRepository;
pub use wish_repository::WishRepository;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::backend::storage::traits::DuplicateEmail;

/// Surface a UNIQUE violation on an `email` column as [`DuplicateEmail`]
pub(crate) fn email_conflict(err: sqlx::Error) -> anyhow::Error {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() && db.message().contains(".email") => {
            DuplicateEmail.into()
        }
        other => other.into(),
    }
}

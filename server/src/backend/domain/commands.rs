//! Domain-level command and result types.
//!
//! Services take these instead of the `shared` DTOs; the REST layer maps
//! request bodies onto them.

pub mod auth {
    use crate::backend::domain::models::{child::Child, parent::Parent};
    use shared::Role;

    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub name: String,
        pub email: String,
        pub password: String,
        pub role: Role,
    }

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
        pub role: Role,
    }

    /// The account behind a session
    #[derive(Debug, Clone)]
    pub enum Account {
        Parent(Parent),
        Child(Child),
    }

    #[derive(Debug, Clone)]
    pub struct AuthResult {
        pub account: Account,
        pub token: String,
    }
}

pub mod children {
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub age: u8,
        pub email: String,
        pub password: String,
        pub gender: Option<String>,
        pub interests: Vec<String>,
    }

    /// Partial update; `None` leaves a field untouched
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub name: Option<String>,
        pub age: Option<u8>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub gender: Option<String>,
        pub interests: Option<Vec<String>>,
    }
}

pub mod tasks {
    use crate::backend::domain::models::task::TaskStatus;

    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub child_id: String,
        pub title: String,
        pub description: Option<String>,
        pub category: Option<String>,
        pub points_awarded: u32,
        pub due_date: Option<String>,
        pub estimated_duration: Option<u32>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateTaskFromWishCommand {
        pub wish_id: String,
        pub points_awarded: u32,
        pub due_date: Option<String>,
    }

    /// Field edits; `None` leaves a field untouched
    #[derive(Debug, Clone, Default)]
    pub struct EditTaskCommand {
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub points_awarded: Option<u32>,
        pub due_date: Option<String>,
        pub estimated_duration: Option<u32>,
    }

    impl EditTaskCommand {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.description.is_none()
                && self.category.is_none()
                && self.points_awarded.is_none()
                && self.due_date.is_none()
                && self.estimated_duration.is_none()
        }
    }

    #[derive(Debug, Clone)]
    pub struct TaskStatusCommand {
        pub status: TaskStatus,
        pub rejection_reason: Option<String>,
    }

    /// Body of a combined `PUT /tasks/:id`
    #[derive(Debug, Clone, Default)]
    pub struct UpdateTaskCommand {
        pub edit: EditTaskCommand,
        pub status: Option<TaskStatusCommand>,
    }
}

pub mod wishes {
    use crate::backend::domain::models::wish::WishStatus;

    #[derive(Debug, Clone)]
    pub struct CreateWishCommand {
        /// Required for parents; children always create for themselves
        pub child_id: Option<String>,
        pub title: String,
        pub description: Option<String>,
        pub category: Option<String>,
        pub points_required: u32,
    }

    #[derive(Debug, Clone, Default)]
    pub struct EditWishCommand {
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub points_required: Option<u32>,
    }

    impl EditWishCommand {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.description.is_none()
                && self.category.is_none()
                && self.points_required.is_none()
        }
    }

    #[derive(Debug, Clone)]
    pub struct WishStatusCommand {
        pub status: WishStatus,
        pub reason: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateWishCommand {
        pub edit: EditWishCommand,
        pub status: Option<WishStatusCommand>,
    }
}

pub mod rewards {
    use crate::backend::domain::models::reward::Reward;

    #[derive(Debug, Clone)]
    pub struct CreateRewardCommand {
        pub reward_name: String,
        pub points: u32,
    }

    #[derive(Debug, Clone)]
    pub struct RedeemRewardCommand {
        pub reward_id: String,
        /// Required when a parent redeems on a child's behalf
        pub child_id: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct RedeemRewardResult {
        pub reward: Reward,
        pub remaining_points: u32,
    }
}

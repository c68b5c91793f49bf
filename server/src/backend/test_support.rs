//! Fixtures for service and router tests: an in-memory database seeded with
//! two families (`p1` with child `c1`, `p2` with child `c2`).

use shared::Role;

use crate::backend::config::Config;
use crate::backend::domain::models::{child::Child, session::Session};
use crate::backend::domain::{AuthService, ChildService, RewardService, SyncHub, TaskService, WishService};
use crate::backend::storage::sqlite::repositories::fixtures;
use crate::backend::storage::{ChildRepository, ChildStorage, DbConnection, ParentRepository, ParentStorage};
use crate::backend::AppState;

pub(crate) struct Harness {
    pub db: DbConnection,
    pub state: AppState,
    pub auth: AuthService,
    pub children: ChildService,
    pub tasks: TaskService,
    pub wishes: WishService,
    pub rewards: RewardService,
    pub sync: SyncHub,
    pub parent: Session,
    pub child: Session,
    pub other_parent: Session,
    pub other_child: Session,
}

impl Harness {
    pub async fn new() -> Self {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let parents = ParentRepository::new(db.clone());
        let children = ChildRepository::new(db.clone());
        for (parent_id, child_id) in [("p1", "c1"), ("p2", "c2")] {
            parents.store_parent(&fixtures::parent(parent_id)).await.expect("seed parent");
            children
                .store_child(&fixtures::child(child_id, parent_id, 0, 0))
                .await
                .expect("seed child");
        }

        let state = AppState::new(db.clone(), &Config::for_tests());

        Self {
            db,
            auth: state.auth_service.clone(),
            children: state.child_service.clone(),
            tasks: state.task_service.clone(),
            wishes: state.wish_service.clone(),
            rewards: state.reward_service.clone(),
            sync: state.sync_hub.clone(),
            state,
            parent: Session::new("p1", Role::Parent, "test"),
            child: Session::new("c1", Role::Child, "test"),
            other_parent: Session::new("p2", Role::Parent, "test"),
            other_child: Session::new("c2", Role::Child, "test"),
        }
    }

    /// Overwrite a child's counters directly
    pub async fn set_points(&self, child_id: &str, total: u32, redeemed: u32) {
        sqlx::query("UPDATE children SET total_points = ?, redeemed_points = ? WHERE id = ?")
            .bind(total)
            .bind(redeemed)
            .bind(child_id)
            .execute(self.db.pool())
            .await
            .expect("Failed to set points");
    }

    pub async fn child_record(&self, child_id: &str) -> Child {
        ChildRepository::new(self.db.clone())
            .get_child(child_id)
            .await
            .expect("Failed to load child")
            .expect("child should exist")
    }
}

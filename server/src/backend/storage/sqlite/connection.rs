use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and ensure the schema exists
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Fresh in-memory database for tests.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool is pinned to exactly one connection that never expires.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Balance is derived as total_points - redeemed_points
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                email TEXT NOT NULL UNIQUE,
                gender TEXT,
                interests TEXT NOT NULL DEFAULT '[]',
                password_hash TEXT NOT NULL,
                total_points INTEGER NOT NULL DEFAULT 0,
                redeemed_points INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CHECK (redeemed_points <= total_points),
                FOREIGN KEY (parent_id) REFERENCES parents (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL,
                child_id TEXT NOT NULL,
                wish_id TEXT,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT,
                points_awarded INTEGER NOT NULL,
                due_date TEXT,
                estimated_duration INTEGER,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                sent_at TEXT,
                approved_at TEXT,
                rejected_at TEXT,
                rejection_reason TEXT,
                completed_at TEXT,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wishes (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL,
                child_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT,
                points_required INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                requested_at TEXT,
                approved_at TEXT,
                rejected_at TEXT,
                rejection_reason TEXT,
                redeemed_at TEXT,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // redeemed_by is history and survives deletion of the child
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rewards (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL,
                reward_name TEXT NOT NULL,
                points INTEGER NOT NULL,
                status TEXT NOT NULL,
                redeemed_by TEXT,
                redeemed_at TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (parent_id) REFERENCES parents (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_children_parent_id ON children(parent_id);",
            "CREATE INDEX IF NOT EXISTS idx_tasks_child_id ON tasks(child_id, created_at DESC);",
            "CREATE INDEX IF NOT EXISTS idx_tasks_parent_id ON tasks(parent_id, created_at DESC);",
            "CREATE INDEX IF NOT EXISTS idx_wishes_child_id ON wishes(child_id, created_at DESC);",
            "CREATE INDEX IF NOT EXISTS idx_wishes_parent_id ON wishes(parent_id, created_at DESC);",
            "CREATE INDEX IF NOT EXISTS idx_rewards_parent_id ON rewards(parent_id, created_at DESC);",
        ] {
            sqlx::query(index).execute(pool).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Failed to list tables");
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        for expected in ["children", "parents", "rewards", "tasks", "wishes"] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_file_database_is_created_on_demand() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("kiddo.db").display());

        DbConnection::new(&url).await.expect("Failed to open database");
        // Opening again must not fail on the existing schema
        DbConnection::new(&url).await.expect("Failed to reopen database");

        assert!(dir.path().join("kiddo.db").exists());
    }
}

//! Database test fixtures
//!
//! Board SQL tests run against the PostgreSQL named by `DATABASE_URL` and
//! are skipped when it is unset. Each `TestDatabase` tags its rows with a
//! unique prefix so tests can share one database and run in parallel.

use sqlx::PgPool;
use uuid::Uuid;

use postboard::backend::post::db as post_db;
use postboard::backend::user::db as user_db;
use postboard::shared::board::{RegisterRequest, SubmitPostRequest};

/// Connect to `DATABASE_URL`, or `None` when it is not set
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    Some(
        PgPool::connect(&database_url)
            .await
            .expect("Failed to create test database pool"),
    )
}

/// Run database migrations for testing
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Remove every row owned by the given users
pub async fn cleanup_test_data(pool: &PgPool, uids: &[String]) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reples WHERE author_uid = ANY($1)")
        .bind(uids)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM posts WHERE author_uid = ANY($1)")
        .bind(uids)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM users WHERE uid = ANY($1)")
        .bind(uids)
        .execute(pool)
        .await?;
    Ok(())
}

/// A migrated database plus the users one test created
pub struct TestDatabase {
    pool: PgPool,
    /// Unique to this fixture; safe to use inside search terms
    pub tag: String,
    uids: Vec<String>,
}

impl TestDatabase {
    pub async fn new() -> Option<Self> {
        let pool = create_test_pool().await?;
        run_migrations(&pool).await.expect("Failed to run migrations");
        Some(Self {
            pool,
            tag: format!("t{}", Uuid::new_v4().simple()),
            uids: Vec::new(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Register a user and return its uid
    pub async fn user(&mut self, name: &str) -> String {
        let uid = format!("{}-{}", self.tag, name);
        let request = RegisterRequest {
            uid: uid.clone(),
            email: format!("{}@{}.test", name, self.tag),
            display_name: uid.clone(),
            photo_url: None,
        };
        user_db::insert_user(&self.pool, &request)
            .await
            .expect("Failed to insert test user");
        self.uids.push(uid.clone());
        uid
    }

    /// Create a post titled `{tag} {title}` and return its number
    pub async fn post(&self, uid: &str, title: &str) -> i64 {
        let request = SubmitPostRequest {
            title: format!("{} {}", self.tag, title),
            content: "body".to_string(),
            image: None,
            uid: uid.to_string(),
        };
        post_db::insert_post(&self.pool, &request)
            .await
            .expect("Failed to insert test post")
            .expect("Test post author missing")
    }

    pub async fn cleanup(&self) {
        cleanup_test_data(&self.pool, &self.uids)
            .await
            .expect("Failed to clean up test data");
    }
}

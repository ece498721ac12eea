use crate::domain::user::{NewUser, User};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub mod memory;
pub(crate) mod records;
pub mod user_repo;

pub use memory::InMemoryUserStore;
pub use user_repo::UserRepository;

pub type DbPool = Pool<Postgres>;

/// Persistence operations over user records.
///
/// Implementations enforce uniqueness of `email` and `external_id` themselves; callers
/// may pre-check with [`UserStore::exists_by_email_or_external_id`] but the store has the last word.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Stores a new user and returns it with its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<User>;

    /// Returns true if any user has the given email or the given external id.
    async fn exists_by_email_or_external_id(&self, email: &str, external_id: Uuid) -> Result<bool>;

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>>;

    /// Cheap connectivity check used by readiness probes.
    async fn ping(&self) -> Result<()>;
}

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(max_connections).connect(database_url).await
}

/// Applies the embedded schema migrations.
///
/// # Errors
/// Returns `MigrateError` if a migration cannot be applied.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

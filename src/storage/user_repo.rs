use crate::domain::user::{NewUser, User};
use crate::error::Result;
use crate::storage::records::UserRecord;
use crate::storage::{DbPool, UserStore};
use async_trait::async_trait;
use uuid::Uuid;

/// `PostgreSQL` user store. Uniqueness is enforced by the `users` table constraints.
#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, external_id, date_of_birth)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, external_id, date_of_birth
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.external_id)
        .bind(user.date_of_birth)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn exists_by_email_or_external_id(&self, email: &str, external_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 OR external_id = $2
            )
            "#,
        )
        .bind(email)
        .bind(external_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, external_id, date_of_birth
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

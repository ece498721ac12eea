use crate::api::schemas::users::UserDto;
use crate::domain::user::NewUser;
use crate::error::{AppError, Result};
use crate::storage::UserStore;
use opentelemetry::{global, metrics::Counter};
use std::sync::Arc;
use uuid::Uuid;

pub const USER_CREATED_MESSAGE: &str = "user successfully created";
pub const USER_EXISTS_MESSAGE: &str = "user already exists";
pub const USER_NOT_FOUND_MESSAGE: &str = "user not found";

#[derive(Clone, Debug)]
struct UserMetrics {
    users_created_total: Counter<u64>,
}

impl UserMetrics {
    fn new() -> Self {
        let meter = global::meter("user-api");
        Self {
            users_created_total: meter
                .u64_counter("users_created_total")
                .with_description("Total number of users created")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    metrics: UserMetrics,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store, metrics: UserMetrics::new() }
    }

    /// Creates a user from an already validated payload and its parsed external id.
    ///
    /// The duplicate check runs before the payload is converted, so a taken email or id
    /// reports a conflict even when the rest of the payload would not convert.
    /// The check is advisory: two concurrent requests can both pass it, in which
    /// case the store rejects the second insert and the caller sees an internal error.
    ///
    /// # Errors
    /// `AppError::Conflict` if the email or external id is taken; store and conversion
    /// failures otherwise.
    #[tracing::instrument(skip(self, user), err(level = "warn"))]
    pub async fn create(&self, user: &UserDto, external_id: Uuid) -> Result<()> {
        if self.store.exists_by_email_or_external_id(&user.email, external_id).await? {
            return Err(AppError::Conflict(USER_EXISTS_MESSAGE.to_string()));
        }

        let new_user = NewUser::try_from(user).map_err(|e| {
            tracing::error!(error = %e, "Payload passed validation but failed to convert");
            AppError::Internal
        })?;

        let stored = self.store.insert(&new_user).await?;

        tracing::info!(user.id = stored.id, "User created");
        self.metrics.users_created_total.add(1, &[]);

        Ok(())
    }

    /// Looks up a user by external id and renders it for the wire.
    ///
    /// # Errors
    /// `AppError::NotFound` if no user has that external id.
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn find_by_external_id(&self, external_id: Uuid) -> Result<UserDto> {
        let user = self
            .store
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))?;

        UserDto::try_from(&user).map_err(|e| {
            tracing::error!(error = %e, user.id = user.id, "Failed to render stored user");
            AppError::Internal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::storage::InMemoryUserStore;
    use async_trait::async_trait;

    fn payload(email: &str, id: &str) -> UserDto {
        UserDto {
            name: "test user".into(),
            email: email.into(),
            id: id.into(),
            date_of_birth: "1990-01-01T00:00:00Z".into(),
        }
    }

    async fn create(service: &UserService, user: &UserDto) -> Result<()> {
        service.create(user, Uuid::parse_str(&user.id).unwrap()).await
    }

    fn service() -> (UserService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        (UserService::new(Arc::clone(&store) as Arc<dyn UserStore>), store)
    }

    /// Passes the duplicate check but rejects every insert, as a racing writer would cause.
    #[derive(Debug)]
    struct RacingStore;

    #[async_trait]
    impl UserStore for RacingStore {
        async fn insert(&self, _user: &NewUser) -> Result<User> {
            Err(AppError::Database(sqlx::Error::RowNotFound))
        }

        async fn exists_by_email_or_external_id(&self, _email: &str, _external_id: Uuid) -> Result<bool> {
            Ok(false)
        }

        async fn find_by_external_id(&self, _external_id: Uuid) -> Result<Option<User>> {
            Ok(None)
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let (service, store) = service();
        let id = "54022f9e-2301-428f-80de-ba73273341fb";

        create(&service, &payload("test@example.com", id)).await.unwrap();
        assert_eq!(store.len().await, 1);

        let found = service.find_by_external_id(Uuid::parse_str(id).unwrap()).await.unwrap();
        assert_eq!(found, payload("test@example.com", id));
    }

    #[tokio::test]
    async fn test_create_conflicts_on_either_field() {
        let (service, store) = service();
        create(&service, &payload("user1@example.com", "2dd002d0-dd56-4491-b77e-61b7dcce7123")).await.unwrap();

        let same_email = create(&service, &payload("user1@example.com", "3a47386e-56d4-4bd8-a015-c2b8bdf646f8")).await;
        let same_id = create(&service, &payload("user2@example.com", "2dd002d0-dd56-4491-b77e-61b7dcce7123")).await;

        assert!(matches!(same_email, Err(AppError::Conflict(ref m)) if m == USER_EXISTS_MESSAGE));
        assert!(matches!(same_id, Err(AppError::Conflict(ref m)) if m == USER_EXISTS_MESSAGE));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_with_unparseable_date_is_internal() {
        let (service, store) = service();
        let mut user = payload("test@example.com", "54022f9e-2301-428f-80de-ba73273341fb");
        user.date_of_birth = "1990-01-01".into();

        assert!(matches!(create(&service, &user).await, Err(AppError::Internal)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_conflict_is_reported_before_conversion() {
        let (service, store) = service();
        let id = "54022f9e-2301-428f-80de-ba73273341fb";
        create(&service, &payload("test@example.com", id)).await.unwrap();

        let mut user = payload("test@example.com", "3a47386e-56d4-4bd8-a015-c2b8bdf646f8");
        user.date_of_birth = "1990-01-01".into();

        let result = create(&service, &user).await;
        assert!(matches!(result, Err(AppError::Conflict(ref m)) if m == USER_EXISTS_MESSAGE));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_store_failure_is_internal() {
        let (service, store) = service();
        store.set_available(false);

        let result = create(&service, &payload("test@example.com", "54022f9e-2301-428f-80de-ba73273341fb")).await;
        assert!(matches!(result, Err(AppError::Internal)));
    }

    #[tokio::test]
    async fn test_insert_race_surfaces_as_store_error() {
        let service = UserService::new(Arc::new(RacingStore));

        let result = create(&service, &payload("test@example.com", "54022f9e-2301-428f-80de-ba73273341fb")).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_unknown_is_not_found() {
        let (service, _store) = service();

        let result = service.find_by_external_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == USER_NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_find_is_idempotent() {
        let (service, _store) = service();
        let id = "54022f9e-2301-428f-80de-ba73273341fb";
        create(&service, &payload("test@example.com", id)).await.unwrap();

        let external_id = Uuid::parse_str(id).unwrap();
        let first = service.find_by_external_id(external_id).await.unwrap();
        let second = service.find_by_external_id(external_id).await.unwrap();
        assert_eq!(first, second);
    }
}

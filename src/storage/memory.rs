use crate::domain::user::{NewUser, User};
use crate::error::{AppError, Result};
use crate::storage::UserStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    last_id: i32,
}

/// Process-local user store with the same uniqueness rules as the `users` table.
///
/// Useful for tests and for running the API without a database. Marking it unavailable
/// makes every call fail the way a lost database connection would.
#[derive(Debug)]
pub struct InMemoryUserStore {
    state: RwLock<State>,
    available: AtomicBool,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self { state: RwLock::new(State::default()), available: AtomicBool::new(true) }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            tracing::error!("In-memory store is marked unavailable");
            Err(AppError::Internal)
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &NewUser) -> Result<User> {
        self.ensure_available()?;
        let mut state = self.state.write().await;

        // Mirrors the unique constraints on email and external_id.
        if state.users.iter().any(|u| u.email == user.email || u.external_id == user.external_id) {
            tracing::warn!(external_id = %user.external_id, "Unique constraint violated on insert");
            return Err(AppError::Internal);
        }

        state.last_id += 1;
        let stored = user.clone().into_user(state.last_id);
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn exists_by_email_or_external_id(&self, email: &str, external_id: Uuid) -> Result<bool> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.users.iter().any(|u| u.email == email || u.external_id == external_id))
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.external_id == external_id).cloned())
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_available()
    }
}

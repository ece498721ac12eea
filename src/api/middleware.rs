use crate::api::schemas::users::UserDto;
use crate::api::validation::validate_user;
use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use uuid::Uuid;

/// A user payload that parsed as JSON and passed [`validate_user`].
///
/// Rejects with a 500 when the body cannot be parsed and with a 422 listing every
/// violation when validation fails, so handlers never see an invalid payload.
#[derive(Debug)]
pub struct ValidatedUser {
    pub user: UserDto,
    /// The payload's `id`, parsed once it has passed the `uuid` rule.
    pub external_id: Uuid,
}

impl<S> FromRequest<S> for ValidatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(user) = Json::<UserDto>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(error = %rejection, "Failed to parse user payload");
            AppError::Internal
        })?;

        let violations = validate_user(&user);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let external_id = Uuid::parse_str(&user.id).map_err(|e| {
            tracing::error!(error = %e, "External id passed validation but failed to parse");
            AppError::Internal
        })?;

        Ok(Self { user, external_id })
    }
}

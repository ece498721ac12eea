use crate::api::AppState;
use crate::api::middleware::ValidatedUser;
use crate::api::schemas::users::{MessageBody, UserEnvelope};
use crate::error::{AppError, Result};
use crate::services::user_service::USER_CREATED_MESSAGE;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

pub const UNPARSEABLE_ID_MESSAGE: &str = "unable to parse the id";

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedUser { user, external_id }: ValidatedUser,
) -> Result<impl IntoResponse> {
    state.user_service.create(&user, external_id).await?;
    Ok((StatusCode::CREATED, Json(MessageBody::new(USER_CREATED_MESSAGE))))
}

pub async fn find_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let external_id = Uuid::parse_str(&id).map_err(|_| AppError::BadRequest(UNPARSEABLE_ID_MESSAGE.to_string()))?;

    let user = state.user_service.find_by_external_id(external_id).await?;
    Ok(Json(UserEnvelope { user }))
}

use crate::application::{ApplicationError, accounts};
use crate::domain::user::User;
use crate::domain::value_objects::UserId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{auth::Administrator, error::ApiError, types::CreateUserRequest};

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Administrator(_): Administrator,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = accounts::list_users(&state.service_deps).await?;
    Ok(Json(users))
}

/// POST /users - 利用者を作成（ユーザー名が重複する場合は409）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Administrator(_): Administrator,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = req.to_new_user().map_err(ApplicationError::from)?;
    let user = accounts::create_user(&state.service_deps, new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Administrator(_): Administrator,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<User>, ApiError> {
    let user = accounts::get_user(&state.service_deps, UserId::new(user_id)).await?;
    Ok(Json(user))
}

/// DELETE /users/:id - 利用者を削除（自分自身は削除できない）
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Administrator(admin): Administrator,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::new(user_id);
    if admin.id == user_id {
        return Err(ApplicationError::Conflict("cannot delete your own account".to_string()).into());
    }
    accounts::delete_user(&state.service_deps, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

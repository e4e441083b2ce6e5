use crate::application::accounts;
use crate::domain::user::User;
use axum::{Json, extract::State};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::ApiJson;
use crate::api::{error::ApiError, types::LoginRequest};

/// POST /auth/login - 資格情報を検証して利用者情報を返す
///
/// セッションは発行しない。以降のリクエストはBasic認証で行う。
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = accounts::authenticate(&state.service_deps, &req.username, &req.password).await?;
    Ok(Json(user))
}

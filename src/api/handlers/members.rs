use crate::application::{ApplicationError, membership};
use crate::domain::member::Member;
use crate::domain::value_objects::MemberId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{auth::RecordsManager, error::ApiError, types::MemberRequest};

pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = membership::list_members(&state.service_deps).await?;
    Ok(Json(members))
}

/// POST /members - 会員を登録（メールアドレスは `@` を含むこと）
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let details = req.to_details().map_err(ApplicationError::from)?;
    let member = membership::register_member(&state.service_deps, details).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    ApiPath(member_id): ApiPath<i64>,
) -> Result<Json<Member>, ApiError> {
    let member = membership::get_member(&state.service_deps, MemberId::new(member_id)).await?;
    Ok(Json(member))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(member_id): ApiPath<i64>,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<Json<Member>, ApiError> {
    let details = req.to_details().map_err(ApplicationError::from)?;
    let member =
        membership::update_member(&state.service_deps, MemberId::new(member_id), details).await?;
    Ok(Json(member))
}

/// DELETE /members/:id - 会員を削除（貸出中の書籍があれば409）
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(member_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    membership::delete_member(&state.service_deps, MemberId::new(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

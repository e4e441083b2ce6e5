use crate::application::accounts;
use crate::domain::user::User;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use std::sync::Arc;

use super::{error::ApiError, handlers::AppState};

/// Basic認証ヘッダーから利用者を認証する
async fn authenticate(parts: &mut Parts, state: &Arc<AppState>) -> Result<User, ApiError> {
    let TypedHeader(Authorization(credentials)) =
        TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

    let user = accounts::authenticate(
        &state.service_deps,
        credentials.username(),
        credentials.password(),
    )
    .await?;
    Ok(user)
}

/// 書籍・会員・貸出を変更できる利用者（admin, librarian）
#[derive(Debug, Clone)]
pub struct RecordsManager(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RecordsManager {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.role.can_manage_records() {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(user))
    }
}

/// 利用者アカウントを管理できる利用者（admin）
#[derive(Debug, Clone)]
pub struct Administrator(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Administrator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.role.can_manage_users() {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(user))
    }
}

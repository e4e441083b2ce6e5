use crate::application::{ApplicationError, Entity, Result, ServiceDependencies};
use crate::domain::user::{NewUser, User};
use crate::domain::value_objects::{Role, UserId};

/// 利用者を登録する
///
/// ユーザー名が既に使われている場合は Conflict。
pub async fn create_user(deps: &ServiceDependencies, user: NewUser) -> Result<User> {
    let user = deps.record_store.insert_user(user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, role = user.role.as_str(), "user created");
    Ok(user)
}

pub async fn get_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    deps.record_store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::User, user_id.value()))
}

pub async fn list_users(deps: &ServiceDependencies) -> Result<Vec<User>> {
    Ok(deps.record_store.list_users().await?)
}

pub async fn delete_user(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    if !deps.record_store.delete_user(user_id).await? {
        return Err(ApplicationError::not_found(Entity::User, user_id.value()));
    }
    tracing::info!(user_id = %user_id, "user deleted");
    Ok(())
}

/// ユーザー名とパスワードを検証する
///
/// 存在しないユーザーとパスワード不一致は区別せず InvalidCredentials を返す。
pub async fn authenticate(
    deps: &ServiceDependencies,
    username: &str,
    password: &str,
) -> Result<User> {
    let user = deps.record_store.find_user_by_username(username).await?;

    match user {
        Some(user) if user.password_hash.verify(password) => Ok(user),
        _ => {
            tracing::warn!(username = %username, "rejected credentials");
            Err(ApplicationError::InvalidCredentials)
        }
    }
}

/// 起動時に管理者アカウントを用意する
///
/// 同名の利用者が既に存在する場合は何もしない（`None`）。
pub async fn ensure_admin(
    deps: &ServiceDependencies,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    if deps
        .record_store
        .find_user_by_username(username)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    let admin = NewUser::new(username, password, "Administrator", Role::Admin)?;
    create_user(deps, admin).await.map(Some)
}

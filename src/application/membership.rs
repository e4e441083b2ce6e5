use crate::application::{ApplicationError, Entity, Result, ServiceDependencies};
use crate::domain::member::{Member, MemberDetails};
use crate::domain::value_objects::MemberId;

pub async fn register_member(
    deps: &ServiceDependencies,
    details: MemberDetails,
) -> Result<Member> {
    let member = deps.record_store.insert_member(details).await?;
    tracing::info!(member_id = %member.id, "member registered");
    Ok(member)
}

pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.record_store
        .get_member(member_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Member, member_id.value()))
}

pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    Ok(deps.record_store.list_members().await?)
}

pub async fn update_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    details: MemberDetails,
) -> Result<Member> {
    deps.record_store
        .update_member(member_id, details)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Member, member_id.value()))
}

/// 会員を削除する
///
/// 貸出中の書籍がある会員は削除できない（Conflict）。
pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    if !deps.record_store.delete_member(member_id).await? {
        return Err(ApplicationError::not_found(Entity::Member, member_id.value()));
    }
    tracing::info!(member_id = %member_id, "member deleted");
    Ok(())
}

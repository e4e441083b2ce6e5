use crate::application::{Result, ServiceDependencies};
use crate::domain::stats::LibraryStats;

/// ダッシュボードの集計を取得する
pub async fn library_stats(deps: &ServiceDependencies) -> Result<LibraryStats> {
    Ok(deps.record_store.library_stats().await?)
}

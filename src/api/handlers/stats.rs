use crate::application::stats;
use crate::domain::stats::LibraryStats;
use axum::{Json, extract::State};
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;

/// GET /stats - 書籍数・貸出可能数・会員数・貸出中の件数
pub async fn library_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LibraryStats>, ApiError> {
    let stats = stats::library_stats(&state.service_deps).await?;
    Ok(Json(stats))
}

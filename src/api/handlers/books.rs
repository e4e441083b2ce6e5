use crate::application::{ApplicationError, catalog};
use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{
    auth::RecordsManager,
    error::ApiError,
    types::{BookRequest, ListBooksQuery},
};

/// GET /books - 書籍一覧（available, categoryで絞り込み可能）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = catalog::list_books(&state.service_deps, query.into()).await?;
    Ok(Json(books))
}

/// POST /books - 書籍を登録
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let details = req.to_details().map_err(ApplicationError::from)?;
    let book = catalog::create_book(&state.service_deps, details).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books/:id - 書籍詳細（貸出可否を含む）
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<i64>,
) -> Result<Json<Book>, ApiError> {
    let book = catalog::get_book(&state.service_deps, BookId::new(book_id)).await?;
    Ok(Json(book))
}

/// PUT /books/:id - 書誌情報を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(book_id): ApiPath<i64>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<Book>, ApiError> {
    let details = req.to_details().map_err(ApplicationError::from)?;
    let book = catalog::update_book(&state.service_deps, BookId::new(book_id), details).await?;
    Ok(Json(book))
}

/// DELETE /books/:id - 書籍を削除（貸出中は409）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(book_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_book(&state.service_deps, BookId::new(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

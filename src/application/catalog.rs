use crate::application::{ApplicationError, Entity, Result, ServiceDependencies};
use crate::domain::book::{Book, BookDetails, BookFilter};
use crate::domain::value_objects::BookId;

/// 書籍を登録する（貸出可能な状態で作成される）
pub async fn create_book(deps: &ServiceDependencies, details: BookDetails) -> Result<Book> {
    let book = deps.record_store.insert_book(details).await?;
    tracing::info!(book_id = %book.id, isbn = %book.details.isbn, "book created");
    Ok(book)
}

pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.record_store
        .get_book(book_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Book, book_id.value()))
}

pub async fn list_books(deps: &ServiceDependencies, filter: BookFilter) -> Result<Vec<Book>> {
    Ok(deps.record_store.list_books(filter).await?)
}

/// 書誌情報を更新する。貸出可否は貸出操作でのみ変わる。
pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    details: BookDetails,
) -> Result<Book> {
    deps.record_store
        .update_book(book_id, details)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Book, book_id.value()))
}

/// 書籍を削除する
///
/// 貸出中の書籍は削除できない（Conflict）。
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    if !deps.record_store.delete_book(book_id).await? {
        return Err(ApplicationError::not_found(Entity::Book, book_id.value()));
    }
    tracing::info!(book_id = %book_id, "book deleted");
    Ok(())
}

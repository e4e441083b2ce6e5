use crate::domain::book::{Book, BookDetails, BookFilter};
use crate::domain::loan::{Loan, LoanFilter};
use crate::domain::member::{Member, MemberDetails};
use crate::domain::stats::LibraryStats;
use crate::domain::user::{NewUser, User};
use crate::domain::value_objects::{BookId, LoanId, MemberId, UserId};
use async_trait::async_trait;

use super::errors::Result;

/// レコードストアポート
///
/// 書籍・会員・利用者のCRUDと貸出の参照を抽象化する。
/// 貸出の作成・返却・削除は `LoanLedger` 経由でのみ行う。
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 書籍を登録する（常に貸出可能として作成される）
    async fn insert_book(&self, details: BookDetails) -> Result<Book>;

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>>;

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>>;

    /// 書誌情報を更新する。貸出可否は変更しない。
    async fn update_book(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>>;

    /// 書籍を削除する
    ///
    /// 貸出中の貸出が参照している場合は `StoreError::Conflict`。
    /// 返却済みの貸出履歴は一緒に削除される。存在しない場合は `false`。
    async fn delete_book(&self, book_id: BookId) -> Result<bool>;

    async fn insert_member(&self, details: MemberDetails) -> Result<Member>;

    async fn get_member(&self, member_id: MemberId) -> Result<Option<Member>>;

    async fn list_members(&self) -> Result<Vec<Member>>;

    async fn update_member(
        &self,
        member_id: MemberId,
        details: MemberDetails,
    ) -> Result<Option<Member>>;

    /// 会員を削除する（規則は `delete_book` と同じ）
    async fn delete_member(&self, member_id: MemberId) -> Result<bool>;

    /// 利用者を登録する
    ///
    /// ユーザー名が重複する場合は `StoreError::Conflict`。
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// 認証に使用される
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn delete_user(&self, user_id: UserId) -> Result<bool>;

    async fn get_loan(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 貸出日時の新しい順に返す
    async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<Loan>>;

    /// 書籍数・貸出可能数・会員数・貸出中の件数を1回の読み取りで数える
    async fn library_stats(&self) -> Result<LibraryStats>;
}

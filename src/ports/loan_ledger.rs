use crate::domain::book::Book;
use crate::domain::loan::{Loan, NewLoan};
use crate::domain::member::Member;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use async_trait::async_trait;

use super::errors::Result;

/// 貸出台帳ポート
///
/// 貸出レコードと書籍の貸出可否を1つの単位で更新するためのトランザクションを提供する。
#[async_trait]
pub trait LoanLedger: Send + Sync {
    /// トランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>>;
}

/// 貸出台帳のトランザクション
///
/// 同じ書籍に対する変更は直列化される。
/// `commit` せずに破棄した場合、すべての書き込みは取り消される。
#[async_trait]
pub trait LedgerTransaction: Send {
    /// 書籍を取得し、トランザクション終了までロックする
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>>;

    async fn find_member(&mut self, member_id: MemberId) -> Result<Option<Member>>;

    /// 貸出を取得し、トランザクション終了までロックする
    async fn lock_loan(&mut self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 貸出を採番して追加する（Active）
    async fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan>;

    /// 貸出の状態を保存する
    async fn save_loan(&mut self, loan: &Loan) -> Result<()>;

    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<()>;

    async fn set_book_availability(&mut self, book_id: BookId, available: bool) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

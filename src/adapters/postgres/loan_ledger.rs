use crate::domain::book::Book;
use crate::domain::loan::{Loan, NewLoan};
use crate::domain::member::Member;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::errors::{Result, StoreError};
use crate::ports::loan_ledger::{LedgerTransaction, LoanLedger};
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::PgStore;
use super::rows::{
    BOOK_COLUMNS, LOAN_COLUMNS, MEMBER_COLUMNS, map_row_to_book, map_row_to_loan,
    map_row_to_member,
};

/// PostgreSQLの台帳トランザクション
///
/// `commit` せずにドロップするとデータベースのトランザクションはロールバックされる。
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LoanLedger for PgStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

#[async_trait]
impl LedgerTransaction for PgTransaction {
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 FOR UPDATE"
        ))
        .bind(book_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// FOR SHARE でコミットまで会員の削除を防ぐ
    async fn find_member(&mut self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1 FOR SHARE"
        ))
        .bind(member_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn lock_loan(&mut self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1 FOR UPDATE"
        ))
        .bind(loan_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO loans (book_id, member_id, loaned_at, returned_at, status)
            VALUES ($1, $2, $3, NULL, 'active')
            RETURNING {LOAN_COLUMNS}
            "#
        ))
        .bind(loan.book_id.value())
        .bind(loan.member_id.value())
        .bind(loan.loaned_at)
        .fetch_one(&mut *self.tx)
        .await?;

        map_row_to_loan(&row)
    }

    async fn save_loan(&mut self, loan: &Loan) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET returned_at = $2, status = $3
            WHERE id = $1
            "#,
        )
        .bind(loan.id.value())
        .bind(loan.returned_at())
        .bind(loan.status().as_str())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("loan {} does not exist", loan.id)));
        }
        Ok(())
    }

    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<()> {
        sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id.value())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn set_book_availability(&mut self, book_id: BookId, available: bool) -> Result<()> {
        let result = sqlx::query("UPDATE books SET available = $2 WHERE id = $1")
            .bind(book_id.value())
            .bind(available)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("book {} does not exist", book_id)));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

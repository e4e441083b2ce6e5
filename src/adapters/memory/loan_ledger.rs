use crate::domain::book::Book;
use crate::domain::loan::{Loan, LoanState, NewLoan};
use crate::domain::member::Member;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::errors::{Result, StoreError};
use crate::ports::loan_ledger::{LedgerTransaction, LoanLedger};
use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{MemoryStore, Tables, next_id};

/// インメモリの台帳トランザクション
///
/// 生存期間中はストアのロックを保持し、作業用コピーに書き込む。
/// コミットでコピーがテーブルを置き換え、ドロップすると破棄される。
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl LoanLedger for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.working.books.get(&book_id).cloned())
    }

    async fn find_member(&mut self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.working.members.get(&member_id).cloned())
    }

    async fn lock_loan(&mut self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.working.loans.get(&loan_id).cloned())
    }

    async fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan> {
        let loan = Loan {
            id: LoanId::new(next_id(&mut self.working.loan_seq)),
            book_id: loan.book_id,
            member_id: loan.member_id,
            loaned_at: loan.loaned_at,
            state: LoanState::Active,
        };
        self.working.loans.insert(loan.id, loan.clone());
        Ok(loan)
    }

    async fn save_loan(&mut self, loan: &Loan) -> Result<()> {
        match self.working.loans.get_mut(&loan.id) {
            Some(stored) => {
                *stored = loan.clone();
                Ok(())
            }
            None => Err(StoreError::Conflict(format!("loan {} does not exist", loan.id))),
        }
    }

    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<()> {
        self.working.loans.remove(&loan_id);
        Ok(())
    }

    async fn set_book_availability(&mut self, book_id: BookId, available: bool) -> Result<()> {
        match self.working.books.get_mut(&book_id) {
            Some(book) => {
                book.available = available;
                Ok(())
            }
            None => Err(StoreError::Conflict(format!("book {} does not exist", book_id))),
        }
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

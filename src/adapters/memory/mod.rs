pub mod loan_ledger;
pub mod record_store;

use crate::domain::book::Book;
use crate::domain::loan::Loan;
use crate::domain::member::Member;
use crate::domain::user::User;
use crate::domain::value_objects::{BookId, LoanId, MemberId, UserId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use loan_ledger::MemoryTransaction;

/// RecordStore と LoanLedger のインメモリ実装
///
/// すべてのテーブルを1つの非同期Mutexで保護するため、
/// 台帳トランザクションは他のすべてのストア操作と直列化される。
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 各テーブルの行と採番（SERIAL列と同じく1から始まる）
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    books: BTreeMap<BookId, Book>,
    members: BTreeMap<MemberId, Member>,
    users: BTreeMap<UserId, User>,
    loans: BTreeMap<LoanId, Loan>,
    book_seq: i64,
    member_seq: i64,
    user_seq: i64,
    loan_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn has_active_loan(&self, predicate: impl Fn(&Loan) -> bool) -> bool {
        self.loans
            .values()
            .any(|loan| loan.is_active() && predicate(loan))
    }
}

use chrono::{DateTime, Utc};

use super::book::Book;
use super::errors::{LendError, ReturnLoanError, ValidationError};
use super::member::Member;
use super::value_objects::{BookId, LoanId, MemberId};

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// 貸出の状態
///
/// 不変条件：返却日時は返却済みの場合にのみ存在する。
/// 型でこの制約を表現し、返却日時のないReturnedを作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Active,
    Returned { returned_at: DateTime<Utc> },
}

impl LoanState {
    /// 永続化された列（status, returned_at）から状態を復元する
    pub fn from_parts(
        status: LoanStatus,
        returned_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        match (status, returned_at) {
            (LoanStatus::Active, None) => Ok(LoanState::Active),
            (LoanStatus::Returned, Some(returned_at)) => Ok(LoanState::Returned { returned_at }),
            (LoanStatus::Active, Some(_)) => Err(ValidationError::InconsistentLoanState(
                "active loan has a return date",
            )),
            (LoanStatus::Returned, None) => Err(ValidationError::InconsistentLoanState(
                "returned loan has no return date",
            )),
        }
    }
}

/// 貸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loaned_at: DateTime<Utc>,
    pub state: LoanState,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.state {
            LoanState::Active => LoanStatus::Active,
            LoanState::Returned { .. } => LoanStatus::Returned,
        }
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            LoanState::Active => None,
            LoanState::Returned { returned_at } => Some(returned_at),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == LoanState::Active
    }
}

/// 採番前の貸出（常にActive）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loaned_at: DateTime<Utc>,
}

/// 貸出一覧の絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub book_id: Option<BookId>,
    pub member_id: Option<MemberId>,
}

impl LoanFilter {
    pub fn matches(&self, loan: &Loan) -> bool {
        self.status.is_none_or(|status| loan.status() == status)
            && self.book_id.is_none_or(|book_id| loan.book_id == book_id)
            && self
                .member_id
                .is_none_or(|member_id| loan.member_id == member_id)
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出可能な書籍のみ貸し出せる（1冊につき貸出中は最大1件）
/// - 作成される貸出は常にActive
///
/// 副作用なし。呼び出し側は同じトランザクション内で書籍を貸出不可にする。
pub fn lend_book(
    book: &Book,
    member: &Member,
    loaned_at: DateTime<Utc>,
) -> Result<NewLoan, LendError> {
    if !book.available {
        return Err(LendError::BookNotAvailable);
    }

    Ok(NewLoan {
        book_id: book.id,
        member_id: member.id,
        loaned_at,
    })
}

/// 純粋関数：貸出を返却する
///
/// 2回目の返却はエラー。最初の返却日時を上書きしない。
pub fn return_loan(loan: &Loan, returned_at: DateTime<Utc>) -> Result<Loan, ReturnLoanError> {
    if !loan.is_active() {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    Ok(Loan {
        state: LoanState::Returned { returned_at },
        ..loan.clone()
    })
}

/// 純粋関数：貸出削除時に貸出可能へ戻すべき書籍
///
/// 貸出中の貸出を削除する場合は暗黙の返却として扱う。
pub fn release_on_delete(loan: &Loan) -> Option<BookId> {
    loan.is_active().then_some(loan.book_id)
}

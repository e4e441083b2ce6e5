use crate::application::{ApplicationError, Entity, Result, ServiceDependencies};
use crate::domain::{
    self,
    commands::{CreateLoan, ReturnLoan},
    loan::{Loan, LoanFilter},
    value_objects::LoanId,
};

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍と会員が存在すること（存在しなければ NotFound）
/// - 書籍が貸出可能であること（貸出中なら BookNotAvailable）
///
/// # 一貫性保証
///
/// 貸出の追加と書籍の貸出不可への変更は1つのトランザクションで行われる。
/// 書籍はトランザクション中ロックされるため、同じ書籍への同時貸出は直列化され、
/// 二重貸出は起こらない。失敗時は何も変更されない。
#[tracing::instrument(skip(deps))]
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<Loan> {
    let mut tx = deps.loan_ledger.begin().await?;

    // 1. 書籍をロックして取得
    let book = tx
        .lock_book(cmd.book_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Book, cmd.book_id.value()))?;

    // 2. 会員の存在確認
    let member = tx
        .find_member(cmd.member_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Member, cmd.member_id.value()))?;

    // 3. ドメイン層の純粋関数を呼び出し
    let new_loan = domain::loan::lend_book(&book, &member, cmd.loaned_at)?;

    // 4. 貸出の追加と貸出可否の変更をまとめてコミット
    let loan = tx.insert_loan(new_loan).await?;
    tx.set_book_availability(book.id, false).await?;
    tx.commit().await?;

    tracing::info!(loan_id = %loan.id, "loan created");
    Ok(loan)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 返却済みの貸出は再返却できない（AlreadyReturned、最初の返却日時は保持される）
///
/// 貸出の更新と書籍の貸出可能への変更は1つのトランザクションで行われる。
#[tracing::instrument(skip(deps))]
pub async fn return_loan(deps: &ServiceDependencies, cmd: ReturnLoan) -> Result<Loan> {
    let mut tx = deps.loan_ledger.begin().await?;

    let loan = tx
        .lock_loan(cmd.loan_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Loan, cmd.loan_id.value()))?;

    let returned = domain::loan::return_loan(&loan, cmd.returned_at)?;

    tx.save_loan(&returned).await?;
    tx.set_book_availability(returned.book_id, true).await?;
    tx.commit().await?;

    tracing::info!(loan_id = %returned.id, book_id = %returned.book_id, "loan returned");
    Ok(returned)
}

/// 貸出を削除する
///
/// 貸出中の貸出を削除する場合は暗黙の返却として書籍を貸出可能に戻す。
/// 削除された貸出を返す。
#[tracing::instrument(skip(deps))]
pub async fn delete_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Loan> {
    let mut tx = deps.loan_ledger.begin().await?;

    let loan = tx
        .lock_loan(loan_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Loan, loan_id.value()))?;

    if let Some(book_id) = domain::loan::release_on_delete(&loan) {
        tx.set_book_availability(book_id, true).await?;
    }
    tx.delete_loan(loan.id).await?;
    tx.commit().await?;

    tracing::info!(loan_id = %loan.id, was_active = loan.is_active(), "loan deleted");
    Ok(loan)
}

/// IDで貸出を取得する
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Loan> {
    deps.record_store
        .get_loan(loan_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(Entity::Loan, loan_id.value()))
}

pub async fn list_loans(deps: &ServiceDependencies, filter: LoanFilter) -> Result<Vec<Loan>> {
    Ok(deps.record_store.list_loans(filter).await?)
}

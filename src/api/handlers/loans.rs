use crate::application::loan::{
    create_loan as execute_create_loan, delete_loan as execute_delete_loan,
    get_loan as execute_get_loan, list_loans as execute_list_loans,
    return_loan as execute_return_loan,
};
use crate::domain::commands::ReturnLoan;
use crate::domain::value_objects::LoanId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{
    auth::RecordsManager,
    error::ApiError,
    types::{CreateLoanRequest, ListLoansQuery, LoanResponse},
};

// ============================================================================
// Command handlers
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - 書籍と会員が存在すること（404）
/// - 書籍が貸出可能であること（409）
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    RecordsManager(staff): RecordsManager,
    ApiJson(req): ApiJson<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let loan = execute_create_loan(&state.service_deps, req.to_command()).await?;
    tracing::debug!(loan_id = %loan.id, staff = %staff.username, "loan recorded");
    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// PUT /loans/:id/return - 書籍を返却
///
/// 既に返却済みの場合は409（最初の返却日時は変わらない）。
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(loan_id): ApiPath<i64>,
) -> Result<Json<LoanResponse>, ApiError> {
    let cmd = ReturnLoan {
        loan_id: LoanId::new(loan_id),
        returned_at: chrono::Utc::now(),
    };

    let loan = execute_return_loan(&state.service_deps, cmd).await?;
    Ok(Json(LoanResponse::from(loan)))
}

/// DELETE /loans/:id - 貸出を削除
///
/// 貸出中の場合は書籍を貸出可能に戻してから削除する。削除した貸出を返す。
pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    RecordsManager(_): RecordsManager,
    ApiPath(loan_id): ApiPath<i64>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_delete_loan(&state.service_deps, LoanId::new(loan_id)).await?;
    Ok(Json(LoanResponse::from(loan)))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /loans/:id - 貸出詳細をIDで取得
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<i64>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_get_loan(&state.service_deps, LoanId::new(loan_id)).await?;
    Ok(Json(LoanResponse::from(loan)))
}

/// GET /loans - オプションフィルタ付き貸出一覧取得
///
/// クエリパラメータ:
/// - status: active, returned
/// - book_id, member_id
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListLoansQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let filter = query.to_filter().map_err(ApiError::BadRequest)?;
    let loans = execute_list_loans(&state.service_deps, filter).await?;
    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

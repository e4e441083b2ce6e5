use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSONボディの抽出器
///
/// 必須項目の欠落や型の不一致は `axum::Json` の422ではなく、
/// 400 `VALIDATION_ERROR` のJSONエラーとして返す。
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// クエリ文字列の抽出器（不正な値は400 `BAD_REQUEST`）
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// パスパラメータの抽出器（不正な値は400 `BAD_REQUEST`）
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

use crate::application::ApplicationError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと認証・リクエスト形式のエラーをHTTPレスポンスに変換する。
#[derive(Debug)]
pub enum ApiError {
    Application(ApplicationError),
    /// 認証情報がない、または不正
    Unauthorized,
    /// ロールの権限が不足
    Forbidden,
    /// リクエストボディの必須項目の欠落・型の不一致
    InvalidBody(String),
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::InvalidCredentials => ApiError::Unauthorized,
            other => ApiError::Application(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 404 Not Found - 参照されたIDが存在しない
            ApiError::Application(ref err @ ApplicationError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }

            // 409 Conflict - ビジネスルール違反
            ApiError::Application(ApplicationError::BookNotAvailable) => (
                StatusCode::CONFLICT,
                "BOOK_NOT_AVAILABLE",
                "Book is not available for loan".to_string(),
            ),
            ApiError::Application(ApplicationError::AlreadyReturned) => (
                StatusCode::CONFLICT,
                "ALREADY_RETURNED",
                "Loan has already been returned".to_string(),
            ),
            ApiError::Application(ApplicationError::Conflict(message)) => {
                (StatusCode::CONFLICT, "CONFLICT", message)
            }

            // 400 Bad Request - 入力値の不備
            ApiError::Application(ApplicationError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            ApiError::InvalidBody(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),

            ApiError::Application(ApplicationError::InvalidCredentials) | ApiError::Unauthorized => {
                let body = Json(ErrorResponse::new(
                    "UNAUTHORIZED",
                    "Valid credentials are required",
                ));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Basic realm=\"library\"")],
                    body,
                )
                    .into_response();
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Your role does not allow this operation".to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(ApplicationError::Store(ref e)) => {
                tracing::error!(error = ?e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Entity;
    use crate::domain::ValidationError;
    use crate::ports::StoreError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ApplicationError::not_found(Entity::Loan, 1).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApplicationError::BookNotAvailable.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApplicationError::AlreadyReturned.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApplicationError::Validation(ValidationError::Blank("title")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(ApiError::InvalidBody("missing field `title`".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::Validation(ValidationError::TooLong {
                field: "isbn",
                max_len: 32
            })
            .into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::from(StoreError::backend("disk full")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_has_challenge_header() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"library\""
        );
    }
}

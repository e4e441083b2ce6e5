use crate::domain::{LendError, ReturnLoanError, ValidationError};
use crate::ports::StoreError;
use thiserror::Error;

/// 見つからなかったレコードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    Member,
    Loan,
    User,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Book => "Book",
            Entity::Member => "Member",
            Entity::Loan => "Loan",
            Entity::User => "User",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 参照されたIDが存在しない
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// 書籍が貸出中
    #[error("Book is not available for loan")]
    BookNotAvailable,

    /// 貸出が既に返却済み
    #[error("Loan has already been returned")]
    AlreadyReturned,

    /// ビジネスルール違反（ユーザー名の重複、貸出中の書籍の削除など）
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// ユーザー名またはパスワードが一致しない
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// ストアの障害
    #[error("Store error")]
    Store(#[source] StoreError),
}

impl ApplicationError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        ApplicationError::NotFound { entity, id }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => ApplicationError::Conflict(message),
            backend => ApplicationError::Store(backend),
        }
    }
}

impl From<LendError> for ApplicationError {
    fn from(err: LendError) -> Self {
        match err {
            LendError::BookNotAvailable => ApplicationError::BookNotAvailable,
        }
    }
}

impl From<ReturnLoanError> for ApplicationError {
    fn from(err: ReturnLoanError) -> Self {
        match err {
            ReturnLoanError::AlreadyReturned => ApplicationError::AlreadyReturned,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;

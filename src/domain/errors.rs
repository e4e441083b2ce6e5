use thiserror::Error;

/// 入力値のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 必須項目が空
    #[error("{0} must not be blank")]
    Blank(&'static str),

    /// 文字数が上限を超えている
    #[error("{field} must be at most {max_len} characters")]
    TooLong {
        field: &'static str,
        max_len: usize,
    },

    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// 出版年が範囲外
    #[error("publication year out of range: {0}")]
    InvalidPublicationYear(i32),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// ユーザー名は3〜64文字の英数字と `_.-` のみ
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// ハッシュ関数が入力を受け付けなかった
    #[error("password could not be hashed: {0}")]
    UnhashablePassword(String),

    /// 永続化されたstatusとreturned_atの組み合わせが矛盾している
    #[error("inconsistent loan state: {0}")]
    InconsistentLoanState(&'static str),
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendError {
    /// 他の貸出が書籍を保持している
    #[error("book is not available for loan")]
    BookNotAvailable,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnLoanError {
    /// 既に返却済み
    #[error("loan has already been returned")]
    AlreadyReturned,
}

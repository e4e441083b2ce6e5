use thiserror::Error;

/// ストア操作のエラー
///
/// 存在しないIDは `Option` / `bool` で表現し、ここには含めない。
#[derive(Debug, Error)]
pub enum StoreError {
    /// 一意制約・参照整合性の違反
    #[error("conflict: {0}")]
    Conflict(String),

    /// 接続・ドライバ・デコードなどの障害
    #[error("storage backend failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
